use actix_web::{get, web, HttpResponse, Responder};
use futures::stream;
use tokio::sync::broadcast::error::RecvError;

use crate::notify::ChangeFeed;

/// Server-sent events feed of task changes.
///
/// Emits a payload-free `taskUpdated` event whenever any task mutation
/// lands; clients are expected to re-fetch the listing.
#[get("/events")]
pub async fn events(feed: web::Data<ChangeFeed>) -> impl Responder {
    let rx = feed.subscribe();

    let stream = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(_) => {
                    let chunk = web::Bytes::from_static(b"event: taskUpdated\ndata: {}\n\n");
                    return Some((Ok::<_, actix_web::Error>(chunk), rx));
                }
                // Dropped events collapse into the next one; keep listening
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return None,
            }
        }
    });

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(stream)
}
