use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use rcgen::{CertificateParams, KeyPair};
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
};
use tokio_rustls::{
    rustls::{
        crypto::ring::default_provider,
        pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer},
        ServerConfig,
    },
    TlsAcceptor,
};

/// In-process SMTP relay that records everything the client sends.
pub struct FakeRelay {
    pub addr: SocketAddr,
    /// PEM encoded certificate presented after `STARTTLS`, for
    /// [`Behavior::StartTls`] relays.
    pub certificate: Option<String>,
    session: Arc<Mutex<Session>>,
}

#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    /// Speak SMTP. `STARTTLS` is advertised but always refused.
    Smtp,
    /// Speak SMTP and upgrade the connection on `STARTTLS` using a
    /// self-signed certificate for `127.0.0.1` and `localhost`.
    StartTls,
    /// Accept the connection, send nothing and record the first raw bytes.
    Silent,
}

#[derive(Debug, Default, Clone)]
pub struct Session {
    pub commands: Vec<String>,
    pub messages: Vec<String>,
    pub raw: Vec<u8>,
    /// Number of commands received before the connection was upgraded.
    pub upgraded_after: Option<usize>,
}

impl FakeRelay {
    pub async fn start(behavior: Behavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let session = Arc::new(Mutex::new(Session::default()));

        let (certificate, acceptor) = match behavior {
            Behavior::StartTls => {
                let (certificate, acceptor) = tls_acceptor();
                (Some(certificate), Some(acceptor))
            }
            Behavior::Smtp | Behavior::Silent => (None, None),
        };

        tokio::spawn({
            let session = Arc::clone(&session);
            async move {
                while let Ok((stream, _)) = listener.accept().await {
                    let session = Arc::clone(&session);
                    let acceptor = acceptor.clone();
                    tokio::spawn(async move {
                        let _ = match behavior {
                            Behavior::Smtp | Behavior::StartTls => {
                                converse(stream, acceptor, &session).await
                            }
                            Behavior::Silent => record_raw(stream, &session).await,
                        };
                    });
                }
            }
        });

        Self {
            addr,
            certificate,
            session,
        }
    }

    pub fn session(&self) -> Session {
        self.session.lock().unwrap().clone()
    }
}

/// Returns a local port nobody is listening on.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

fn tls_acceptor() -> (String, TlsAcceptor) {
    let key_pair = KeyPair::generate().unwrap();
    let certificate = CertificateParams::new(vec!["127.0.0.1".to_owned(), "localhost".to_owned()])
        .unwrap()
        .self_signed(&key_pair)
        .unwrap();

    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));
    let config = ServerConfig::builder_with_provider(Arc::new(default_provider()))
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_no_client_auth()
        .with_single_cert(vec![certificate.der().clone()], key)
        .unwrap();

    (certificate.pem(), TlsAcceptor::from(Arc::new(config)))
}

enum Outcome {
    Closed,
    Upgrade,
}

async fn converse(
    stream: TcpStream,
    acceptor: Option<TlsAcceptor>,
    session: &Mutex<Session>,
) -> std::io::Result<()> {
    let mut stream = BufReader::new(stream);
    stream.write_all(b"220 relay.test ESMTP ready\r\n").await?;

    match exchange(&mut stream, acceptor.is_some(), session).await? {
        Outcome::Closed => Ok(()),
        Outcome::Upgrade => {
            let Some(acceptor) = acceptor else {
                return Ok(());
            };
            {
                let mut session = session.lock().unwrap();
                session.upgraded_after = Some(session.commands.len());
            }
            // the client waits for our 220 before the handshake, so nothing is buffered
            let stream = acceptor.accept(stream.into_inner()).await?;
            exchange(&mut BufReader::new(stream), false, session)
                .await
                .map(drop)
        }
    }
}

async fn exchange<S>(
    stream: &mut BufReader<S>,
    can_upgrade: bool,
    session: &Mutex<Session>,
) -> std::io::Result<Outcome>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        if stream.read_line(&mut line).await? == 0 {
            return Ok(Outcome::Closed);
        }

        let command = line.trim_end().to_owned();
        session.lock().unwrap().commands.push(command.clone());

        let verb = command
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();

        let reply: &[u8] = match verb.as_str() {
            "EHLO" => b"250-relay.test\r\n250-STARTTLS\r\n250 AUTH PLAIN LOGIN\r\n",
            "STARTTLS" if can_upgrade => {
                stream.write_all(b"220 2.0.0 Ready to start TLS\r\n").await?;
                stream.flush().await?;
                return Ok(Outcome::Upgrade);
            }
            "STARTTLS" => b"454 4.7.0 TLS not available\r\n",
            "AUTH" => b"235 2.7.0 Authentication successful\r\n",
            "MAIL" | "RCPT" | "RSET" | "NOOP" => b"250 2.0.0 OK\r\n",
            "DATA" => {
                stream
                    .write_all(b"354 End data with <CR><LF>.<CR><LF>\r\n")
                    .await?;
                let message = read_data(stream).await?;
                session.lock().unwrap().messages.push(message);
                b"250 2.0.0 OK queued\r\n"
            }
            "QUIT" => {
                stream.write_all(b"221 2.0.0 Bye\r\n").await?;
                stream.flush().await?;
                return Ok(Outcome::Closed);
            }
            _ => b"502 5.5.2 Command not recognized\r\n",
        };
        stream.write_all(reply).await?;
        stream.flush().await?;
    }
}

async fn read_data<S>(stream: &mut BufReader<S>) -> std::io::Result<String>
where
    S: AsyncRead + Unpin,
{
    let mut lines = Vec::new();
    let mut line = String::new();
    loop {
        line.clear();
        if stream.read_line(&mut line).await? == 0 {
            break;
        }
        let content = line.trim_end_matches(['\r', '\n']);
        if content == "." {
            break;
        }
        lines.push(content.strip_prefix('.').unwrap_or(content).to_owned());
    }
    Ok(lines.join("\r\n"))
}

async fn record_raw(mut stream: TcpStream, session: &Mutex<Session>) -> std::io::Result<()> {
    let mut buf = [0; 16];
    if let Ok(n) = tokio::time::timeout(Duration::from_secs(5), stream.read(&mut buf)).await {
        session.lock().unwrap().raw.extend_from_slice(&buf[..n?]);
    }
    Ok(())
}
