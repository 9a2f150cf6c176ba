//! Простейший UDP агент для тестов: отвечает на SetRequest тем же
//! сообщением с тегом Response, опционально подменяя error-status.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

const TAG_SET_REQUEST: u8 = 0xA3;
const TAG_RESPONSE: u8 = 0xA2;

#[derive(Debug, Clone, Copy)]
pub enum Behaviour {
    /// Не отвечает вообще
    Silent,
    /// Подтверждает SET
    Accept,
    /// Отвечает с заданным error-status
    Reject { error_status: u8 },
    /// Игнорирует первые `n` запросов, затем подтверждает
    AcceptAfter(usize),
}

pub struct FakeAgent {
    pub addr: SocketAddr,
    pub requests: Arc<AtomicUsize>,
    pub received: Arc<std::sync::Mutex<Vec<Vec<u8>>>>,
    task: JoinHandle<()>,
}

impl FakeAgent {
    pub async fn start(behaviour: Behaviour) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let requests = Arc::new(AtomicUsize::new(0));
        let received = Arc::new(std::sync::Mutex::new(Vec::new()));

        let counter = Arc::clone(&requests);
        let log = Arc::clone(&received);
        let task = tokio::spawn(async move {
            let mut buf = vec![0u8; 65535];
            loop {
                let Ok((len, peer)) = socket.recv_from(&mut buf).await else {
                    return;
                };
                let message = buf[..len].to_vec();
                let seen = counter.fetch_add(1, Ordering::SeqCst);
                log.lock().unwrap().push(message.clone());

                let reply = match behaviour {
                    Behaviour::Silent => None,
                    Behaviour::Accept => respond(message, None),
                    Behaviour::Reject { error_status } => respond(message, Some(error_status)),
                    Behaviour::AcceptAfter(n) if seen >= n => respond(message, None),
                    Behaviour::AcceptAfter(_) => None,
                };

                if let Some(reply) = reply {
                    let _ = socket.send_to(&reply, peer).await;
                }
            }
        });

        Self {
            addr,
            requests,
            received,
            task,
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Drop for FakeAgent {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Длина заголовка TLV и длина значения
fn header(bytes: &[u8], at: usize) -> Option<(usize, usize)> {
    let first = *bytes.get(at + 1)?;
    if first < 0x80 {
        return Some((2, first as usize));
    }
    let count = (first & 0x7F) as usize;
    let mut len = 0usize;
    for i in 0..count {
        len = (len << 8) | *bytes.get(at + 2 + i)? as usize;
    }
    Some((2 + count, len))
}

fn skip(bytes: &[u8], at: usize) -> Option<usize> {
    let (head, len) = header(bytes, at)?;
    Some(at + head + len)
}

/// Превращает v2c SetRequest в Response
fn respond(mut message: Vec<u8>, error_status: Option<u8>) -> Option<Vec<u8>> {
    let (outer, _) = header(&message, 0)?;
    let version_end = skip(&message, outer)?;
    let pdu_at = skip(&message, version_end)?;

    if *message.get(pdu_at)? != TAG_SET_REQUEST {
        return None;
    }
    message[pdu_at] = TAG_RESPONSE;

    if let Some(status) = error_status {
        let (pdu_head, _) = header(&message, pdu_at)?;
        let status_at = skip(&message, pdu_at + pdu_head)?;
        let (status_head, status_len) = header(&message, status_at)?;
        let index_at = status_at + status_head + status_len;
        let (index_head, index_len) = header(&message, index_at)?;
        if status_len != 1 || index_len != 1 {
            return None;
        }
        message[status_at + status_head] = status;
        message[index_at + index_head] = 1;
    }

    Some(message)
}

/// Все OID ifAdminStatus с суффиксом, которые встречаются в сообщении
pub fn admin_status_instances(message: &[u8]) -> Vec<u8> {
    // 1.3.6.1.2.1.2.2.1.7 в BER: 2B 06 01 02 01 02 02 01 07
    const PREFIX: [u8; 9] = [0x2B, 0x06, 0x01, 0x02, 0x01, 0x02, 0x02, 0x01, 0x07];
    message
        .windows(PREFIX.len() + 1)
        .filter(|w| w[..PREFIX.len()] == PREFIX)
        .map(|w| w[PREFIX.len()])
        .collect()
}
