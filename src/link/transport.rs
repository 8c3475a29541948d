//! Trait abstraction for wireless link I/O to enable testing

use async_trait::async_trait;
use std::io;

/// Trait for raw link I/O operations
#[async_trait]
pub trait FrameTransport: Send {
    /// Receive bytes from the link into `buf`, returning the number of bytes
    /// read. A return of 0 means the peer closed the connection.
    async fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Send all data over the link
    async fn send(&mut self, data: &[u8]) -> io::Result<()>;
}

/// Wrapper around bluer::rfcomm::Stream that implements FrameTransport
pub struct RfcommTransport {
    stream: bluer::rfcomm::Stream,
}

impl RfcommTransport {
    pub fn new(stream: bluer::rfcomm::Stream) -> Self {
        Self { stream }
    }
}

#[async_trait]
impl FrameTransport for RfcommTransport {
    async fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        use tokio::io::AsyncReadExt;
        self.stream.read(buf).await
    }

    async fn send(&mut self, data: &[u8]) -> io::Result<()> {
        use tokio::io::AsyncWriteExt;
        self.stream.write_all(data).await?;
        self.stream.flush().await
    }
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Mock link transport for testing
    ///
    /// Replays a scripted sequence of inbound messages; once the script is
    /// exhausted, `recv` reports a closed connection (0 bytes).
    #[derive(Clone)]
    pub struct MockTransport {
        pub incoming: Arc<Mutex<VecDeque<io::Result<Vec<u8>>>>>,
        pub sent_data: Arc<Mutex<Vec<Vec<u8>>>>,
        pub send_error: Arc<Mutex<Option<io::ErrorKind>>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self {
                incoming: Arc::new(Mutex::new(VecDeque::new())),
                sent_data: Arc::new(Mutex::new(Vec::new())),
                send_error: Arc::new(Mutex::new(None)),
            }
        }

        /// Queue an inbound text message
        pub fn push_message(&self, text: &str) {
            self.incoming
                .lock()
                .unwrap()
                .push_back(Ok(text.as_bytes().to_vec()));
        }

        /// Queue a transport error to surface on the next receive
        pub fn push_error(&self, kind: io::ErrorKind) {
            self.incoming
                .lock()
                .unwrap()
                .push_back(Err(io::Error::new(kind, "mock transport error")));
        }

        pub fn get_sent_data(&self) -> Vec<Vec<u8>> {
            self.sent_data.lock().unwrap().clone()
        }

        pub fn set_send_error(&self, kind: io::ErrorKind) {
            *self.send_error.lock().unwrap() = Some(kind);
        }
    }

    #[async_trait]
    impl FrameTransport for MockTransport {
        async fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.incoming.lock().unwrap().pop_front() {
                Some(Ok(bytes)) => {
                    let n = bytes.len().min(buf.len());
                    buf[..n].copy_from_slice(&bytes[..n]);
                    Ok(n)
                }
                Some(Err(e)) => Err(e),
                // Script exhausted: behave like a peer that hung up
                None => Ok(0),
            }
        }

        async fn send(&mut self, data: &[u8]) -> io::Result<()> {
            if let Some(kind) = *self.send_error.lock().unwrap() {
                return Err(io::Error::new(kind, "mock send error"));
            }
            self.sent_data.lock().unwrap().push(data.to_vec());
            Ok(())
        }
    }
}
