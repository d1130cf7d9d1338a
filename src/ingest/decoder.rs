//! Streaming decoder for the input ports document.
//!
//! The document is one JSON object whose keys are port IDs and whose values
//! are port objects. A blocking producer walks the object with a
//! `serde_json` map visitor and hands each decoded entry over a bounded
//! channel, so at most a couple of records are held in memory regardless of
//! the document size.

use crate::core::{Port, PortsError, Result};
use futures::Stream;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::fs::File;
use std::future::Future;
use std::io::{BufReader, Read};
use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// One decoded member of the document: the key and the port built from it.
pub type PortEntry = (String, Port);

/// JSON shape of a port value. The ID comes from the member key.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PortRecord {
    #[serde(deserialize_with = "null_as_default")]
    name: String,
    #[serde(deserialize_with = "null_as_default")]
    city: String,
    #[serde(deserialize_with = "null_as_default")]
    country: String,
    #[serde(deserialize_with = "null_as_default")]
    alias: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    regions: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    coordinates: Vec<f64>,
    #[serde(deserialize_with = "null_as_default")]
    province: String,
    #[serde(deserialize_with = "null_as_default")]
    timezone: String,
    #[serde(deserialize_with = "null_as_default")]
    unlocs: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    code: String,
}

impl PortRecord {
    fn into_entry(self, id: String) -> PortEntry {
        let port = Port {
            id: id.clone(),
            name: self.name,
            city: self.city,
            country: self.country,
            alias: self.alias,
            regions: self.regions,
            coordinates: self.coordinates,
            province: self.province,
            timezone: self.timezone,
            unlocs: self.unlocs,
            code: self.code,
        };
        (id, port)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Walks the top-level object and pushes every member into the channel.
struct PortMapVisitor<'a> {
    tx: &'a mpsc::Sender<Result<PortEntry>>,
}

impl<'de> Visitor<'de> for PortMapVisitor<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object mapping port IDs to ports")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        while let Some(id) = map.next_key::<String>()? {
            let record: PortRecord = map.next_value()?;
            if self.tx.blocking_send(Ok(record.into_entry(id))).is_err() {
                return Err(de::Error::custom("port stream dropped by consumer"));
            }
        }
        Ok(())
    }
}

fn produce<R: Read>(reader: R, tx: &mpsc::Sender<Result<PortEntry>>) {
    let mut deserializer = serde_json::Deserializer::from_reader(BufReader::new(reader));
    let outcome = (&mut deserializer)
        .deserialize_map(PortMapVisitor { tx })
        .and_then(|()| deserializer.end());

    if let Err(e) = outcome {
        if tx.is_closed() {
            return;
        }
        let err = if e.is_io() {
            PortsError::Io(e.into())
        } else {
            PortsError::malformed(&e)
        };
        // A closed channel here means the consumer went away meanwhile.
        let _ = tx.blocking_send(Err(err));
    }
}

/// Forward-only stream of `(id, port)` entries decoded from a document.
///
/// The stream ends after the first error. Dropping it stops the producer
/// at the next entry and releases the reader.
pub struct PortStream {
    rx: mpsc::Receiver<Result<PortEntry>>,
    producer: JoinHandle<()>,
    finished: bool,
}

impl PortStream {
    /// Open a document on disk.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            PortsError::Io(std::io::Error::new(
                e.kind(),
                format!("open ports file {}: {}", path.display(), e),
            ))
        })?;
        Ok(Self::from_reader(file))
    }

    /// Decode from any reader. Must be called within a Tokio runtime.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: Read + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(1);
        let producer = tokio::task::spawn_blocking(move || produce(reader, &tx));
        Self {
            rx,
            producer,
            finished: false,
        }
    }
}

impl Stream for PortStream {
    type Item = Result<PortEntry>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.finished {
            return Poll::Ready(None);
        }

        match self.rx.poll_recv(cx) {
            Poll::Ready(Some(Ok(entry))) => Poll::Ready(Some(Ok(entry))),
            Poll::Ready(Some(Err(e))) => {
                self.finished = true;
                Poll::Ready(Some(Err(e)))
            },
            // Channel closed: surface a producer panic instead of a clean end.
            Poll::Ready(None) => match Pin::new(&mut self.producer).poll(cx) {
                Poll::Ready(Ok(())) => {
                    self.finished = true;
                    Poll::Ready(None)
                },
                Poll::Ready(Err(e)) => {
                    self.finished = true;
                    Poll::Ready(Some(Err(PortsError::Join(e))))
                },
                Poll::Pending => Poll::Pending,
            },
            Poll::Pending => Poll::Pending,
        }
    }
}
