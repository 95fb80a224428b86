use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// One HTTP request as received by [`serve_once`].
pub struct CapturedRequest {
    pub head: String,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or("")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

async fn read_more(socket: &mut TcpStream, buffer: &mut Vec<u8>) {
    let mut chunk = [0u8; 8192];
    let n = socket.read(&mut chunk).await.unwrap();
    assert!(n > 0, "client closed the connection mid-request");
    buffer.extend_from_slice(&chunk[..n]);
}

/// Accepts a single connection on a local port, answers it with `status`
/// and a JSON `body`, and hands back what the client sent.
pub async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buffer = Vec::new();

        let head_end = loop {
            if let Some(pos) = find(&buffer, b"\r\n\r\n") {
                break pos + 4;
            }
            read_more(&mut socket, &mut buffer).await;
        };
        let mut request = CapturedRequest {
            head: String::from_utf8_lossy(&buffer[..head_end]).into_owned(),
            body: Vec::new(),
        };

        let length = request
            .header("content-length")
            .and_then(|v| v.parse::<usize>().ok());
        match length {
            Some(length) => {
                while buffer.len() < head_end + length {
                    read_more(&mut socket, &mut buffer).await;
                }
                request.body = buffer[head_end..head_end + length].to_vec();
            }
            None if request
                .header("transfer-encoding")
                .is_some_and(|v| v.eq_ignore_ascii_case("chunked")) =>
            {
                while !buffer.ends_with(b"0\r\n\r\n") {
                    read_more(&mut socket, &mut buffer).await;
                }
                request.body = buffer[head_end..].to_vec();
            }
            None => {}
        }

        let response = format!(
            "HTTP/1.1 {} Fake\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.flush().await.unwrap();
        request
    });

    (format!("http://{}", addr), handle)
}
