//! Raw network printing.

use std::io::Write;
use std::net::{TcpStream, ToSocketAddrs};

use super::Scribe;
use crate::error::Result;

/// Port of the raw (JetDirect) print service.
pub const DEFAULT_PRINT_PORT: u16 = 9100;

impl Scribe {
    /// Finalise the document and send it to `host:port`.
    pub fn print(self, host: &str, port: u16) -> Result<()> {
        self.print_to((host, port))
    }

    /// Finalise the document and send it to `addr`.
    ///
    /// The connection is opened only once the document is complete. Failures are
    /// returned as they happen; nothing is retried.
    pub fn print_to(self, addr: impl ToSocketAddrs) -> Result<()> {
        let bytes = self.to_bytes()?;
        let mut stream = TcpStream::connect(addr)?;
        log::info!(
            "sending {} bytes to printer {}",
            bytes.len(),
            stream
                .peer_addr()
                .map(|a| a.to_string())
                .unwrap_or_else(|_| "(unknown)".to_string())
        );
        stream.write_all(&bytes)?;
        stream.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::geometry::Margins;
    use crate::scribe::PageKind;
    use std::io::Read;
    use std::net::TcpListener;

    #[test]
    fn test_print_sends_document() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = std::thread::spawn(move || {
            let (mut socket, _) = listener.accept().unwrap();
            let mut received = Vec::new();
            socket.read_to_end(&mut received).unwrap();
            received
        });

        let mut scribe = Scribe::new();
        scribe
            .new_page(PageKind::Letter, false, Margins::default())
            .unwrap();
        scribe.print_to(addr).unwrap();

        let received = server.join().unwrap();
        assert!(received.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_print_without_page_does_not_connect() {
        let result = Scribe::new().print("127.0.0.1", 9);
        assert!(matches!(result, Err(Error::InvalidState(_))));
    }

    #[test]
    fn test_print_connection_refused_is_io() {
        // bind then drop to get a port nobody listens on
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let mut scribe = Scribe::new();
        scribe
            .new_page(PageKind::Letter, false, Margins::default())
            .unwrap();
        assert!(matches!(scribe.print("127.0.0.1", port), Err(Error::Io(_))));
    }
}
