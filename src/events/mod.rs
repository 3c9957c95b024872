use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicNackOptions, BasicPublishOptions,
    QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use once_cell::sync::Lazy;
use rocket::futures::StreamExt;
use rocket::serde::{Deserialize, Serialize};
use std::future::Future;

use crate::config::FILE_DASHBOARD_CONFIG;

/// broadcast whenever any record in a workspace is created, updated, or deleted.
/// Listeners only learn which workspace went stale, never what changed; they are
/// expected to re-run their queries
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(crate = "rocket::serde")]
pub struct CollectionChanged {
    #[serde(rename = "workspaceId")]
    pub workspace_id: u32,
}

pub static COLLECTION_CHANGED_QUEUE: &str = "collection_changed";

struct RabbitProvider {
    /// the connection to the rabbit mq
    connection: Connection,
    /// the channel that we will be consuming messages from / publishing messages to
    channel: Channel,
}

/// sets up a long-running consumer job that invokes the passed [function](Fn) for every
/// [CollectionChanged] event on the queue
/// * `function` - the async function to be called on each event. It must output `true`
///   if the event was handled, and `false` if it wasn't. That boolean status will be
///   used to determine if the rabbit message should be acknowledged or not
#[cfg(any(not(test), rust_analyzer))]
pub fn collection_change_consumer<F, Fut>(function: F)
where
    F: Fn(CollectionChanged) -> Fut + Send + 'static,
    Fut: Future<Output = bool> + Send,
{
    let config = FILE_DASHBOARD_CONFIG.clone();
    if config.rabbit_mq.enabled {
        // using as_ref here because I definitely do _not_ want to clone the rabbit connection
        let provider = RABBIT_PROVIDER.as_ref().unwrap();
        async_global_executor::spawn(async move {
            let mut consumer = provider
                .channel
                .basic_consume(
                    COLLECTION_CHANGED_QUEUE,
                    "collection_changed_consumer",
                    BasicConsumeOptions::default(),
                    FieldTable::default(),
                )
                .await
                .unwrap();
            while let Some(delivery) = consumer.next().await {
                let delivery = delivery.expect("error in consumer");
                let event: CollectionChanged = match serde_json::from_slice(&delivery.data) {
                    Ok(event) => event,
                    Err(e) => {
                        // a malformed event can never succeed, so requeueing it would loop forever
                        log::error!("Dropping malformed collection change event. Exception is {e:?}");
                        delivery
                            .ack(BasicAckOptions::default())
                            .await
                            .expect("ack failed");
                        continue;
                    }
                };
                if function(event).await {
                    delivery
                        .ack(BasicAckOptions::default())
                        .await
                        .expect("ack failed");
                } else {
                    log::info!("not acking message because the listener returned false");
                    delivery
                        .nack(BasicNackOptions {
                            multiple: false,
                            requeue: true,
                        })
                        .await
                        .unwrap();
                }
            }
        })
        .detach();
    }
}

/// publishes a [CollectionChanged] event for the passed workspace.
/// failing to publish will not return an error, but will log the reason for failure.
/// The events only invalidate caches, so losing one never corrupts anything
#[cfg(any(not(test), rust_analyzer))]
pub fn publish_collection_changed(workspace_id: u32) {
    let config = FILE_DASHBOARD_CONFIG.clone();
    if !config.rabbit_mq.enabled {
        return;
    }
    let provider = RABBIT_PROVIDER.as_ref().unwrap();
    let channel = &provider.channel;
    let event = CollectionChanged { workspace_id };
    let payload = match serde_json::to_vec(&event) {
        Ok(payload) => payload,
        Err(e) => {
            log::error!("Failed to serialize collection change event. Exception is {e:?}");
            return;
        }
    };
    let res = async_global_executor::block_on(channel.basic_publish(
        "",
        COLLECTION_CHANGED_QUEUE,
        BasicPublishOptions::default(),
        &payload,
        BasicProperties::default(),
    ));
    if let Err(e) = res {
        log::error!(
            "Failed to publish collection change for workspace {workspace_id}. Exception is {:?}",
            e
        );
    }
}

/// should only be called if RabbitConfig.enabled = true
#[cfg(any(not(test), rust_analyzer))]
impl RabbitProvider {
    fn init() -> Self {
        let config = FILE_DASHBOARD_CONFIG.clone();
        let (connection, channel) = async_global_executor::block_on(async {
            let rabbit_connection = Connection::connect(
                &config.rabbit_mq.address.unwrap(),
                ConnectionProperties::default(),
            )
            .await
            .unwrap();
            let channel = rabbit_connection.create_channel().await.unwrap();
            // even though this isn't used anywhere, we need to declare the queue or else it won't exist when we go to consume it
            channel
                .queue_declare(
                    COLLECTION_CHANGED_QUEUE,
                    QueueDeclareOptions::default(),
                    FieldTable::default(),
                )
                .await
                .unwrap();
            (rabbit_connection, channel)
        });
        RabbitProvider {
            connection,
            channel,
        }
    }
}

#[cfg(any(not(test), rust_analyzer))]
static RABBIT_PROVIDER: Lazy<Option<RabbitProvider>> = Lazy::new(|| {
    let config = FILE_DASHBOARD_CONFIG.clone();
    return if config.rabbit_mq.enabled {
        Some(RabbitProvider::init())
    } else {
        None
    };
});

// ---------------------------- test implementations that don't start up rabbit

#[cfg(all(test, not(rust_analyzer)))]
pub fn collection_change_consumer<F, Fut>(_: F)
where
    F: Fn(CollectionChanged) -> Fut + Send + 'static,
    Fut: Future<Output = bool> + Send,
{
}

#[cfg(all(test, not(rust_analyzer)))]
pub fn publish_collection_changed(_: u32) {}
