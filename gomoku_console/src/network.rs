use tungstenite::Message;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use serde::{Serialize, de};


#[derive(Debug)]
pub enum CommunicationError {
    ConnectionClosed,
    Socket(tungstenite::Error),
    Serde(serde_json::Error),
    UnexpectedMessage(String),
}

impl From<tungstenite::Error> for CommunicationError {
    fn from(err: tungstenite::Error) -> Self {
        match err {
            tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
                CommunicationError::ConnectionClosed
            }
            err => CommunicationError::Socket(err),
        }
    }
}

pub async fn write_obj_async<T, S>(sink: &mut S, obj: &T) -> Result<(), CommunicationError>
where
    T: Serialize,
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    let serialized = serde_json::to_string(obj).map_err(CommunicationError::Serde)?;
    sink.send(Message::text(serialized)).await?;
    Ok(())
}

// Skips control frames. A malformed text message is reported as `Serde`, after which the stream
// is still usable.
pub async fn read_obj_async<T, S>(stream: &mut S) -> Result<T, CommunicationError>
where
    T: de::DeserializeOwned,
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    loop {
        let msg = stream.next().await.ok_or(CommunicationError::ConnectionClosed)??;
        match msg {
            Message::Text(text) => {
                return serde_json::from_str(text.as_str()).map_err(CommunicationError::Serde);
            }
            Message::Close(_) => return Err(CommunicationError::ConnectionClosed),
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            Message::Binary(data) => {
                return Err(CommunicationError::UnexpectedMessage(format!(
                    "Expected text, got {} bytes of binary data",
                    data.len()
                )));
            }
        }
    }
}
