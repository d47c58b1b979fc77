use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use lettre::Message;
use owl_email_contracts::{Email, EmailSendError, EmailService};
use owl_email_impl::{
    EmailServiceConfig, EmailServiceImpl, LettreSmtpTransport, SmtpConnection, SmtpSecurity,
    SmtpTransportService,
};
use owl_models::Sensitive;
use owl_testing::relay::{closed_port, Behavior, FakeRelay};
use owl_utils::assert_matches;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn plain_delivers_message() {
    let relay = FakeRelay::start(Behavior::Smtp).await;
    let sut = service(relay.addr.port(), false);

    sut.send(email()).await.unwrap();

    let session = relay.session();
    let commands = session.commands;
    assert!(commands[0].starts_with("EHLO "), "{commands:?}");
    assert!(!commands.iter().any(|c| c == "STARTTLS"), "{commands:?}");

    let auth = commands
        .iter()
        .find_map(|c| c.strip_prefix("AUTH PLAIN "))
        .unwrap();
    assert_eq!(
        STANDARD.decode(auth).unwrap(),
        b"\0relay-user\0relay-password"
    );

    assert!(commands
        .iter()
        .any(|c| c.starts_with("MAIL FROM:<no-reply@theowl.solutions>")));
    assert!(commands
        .iter()
        .any(|c| c.starts_with("RCPT TO:<leads@theowl.solutions>")));

    assert_eq!(session.messages.len(), 1);
    let message = &session.messages[0];
    assert!(message.contains("Subject: Nuevo lead OWL LATAM: Ana Gomez - Acme\r\n"));
    assert!(message.contains("Reply-To: ana@acme.com\r\n"));
    assert!(message.contains("To: leads@theowl.solutions\r\n"));
    assert!(message.contains("Pagina web: -"));
}

#[tokio::test]
async fn starttls_upgrades_before_auth() {
    let relay = FakeRelay::start(Behavior::StartTls).await;
    let transport =
        LettreSmtpTransport::default().with_root_certificate(relay.certificate.clone().unwrap());
    let sut = EmailServiceImpl::new(transport, config(relay.addr.port(), true));

    sut.send(email()).await.unwrap();

    let session = relay.session();
    let verbs = session
        .commands
        .iter()
        .map(|c| c.split_whitespace().next().unwrap_or_default())
        .collect::<Vec<_>>();
    assert_eq!(
        verbs[..4],
        ["EHLO", "STARTTLS", "EHLO", "AUTH"],
        "{:?}",
        session.commands
    );
    // everything after the second command travelled over TLS
    assert_eq!(session.upgraded_after, Some(2));
    assert_eq!(session.messages.len(), 1);
    assert!(session.messages[0].contains("Pagina web: -"));
}

#[tokio::test]
async fn starttls_refused_stops_before_auth() {
    let relay = FakeRelay::start(Behavior::Smtp).await;
    let sut = service(relay.addr.port(), true);

    let result = sut.send(email()).await;

    assert_matches!(result, Err(EmailSendError::Other(_)));
    let session = relay.session();
    assert!(session.commands[0].starts_with("EHLO "), "{session:?}");
    assert_eq!(session.commands[1], "STARTTLS");
    assert!(!session.commands.iter().any(|c| c.starts_with("AUTH")));
    assert!(session.messages.is_empty());
}

#[tokio::test]
async fn starttls_rejects_untrusted_certificate() {
    let relay = FakeRelay::start(Behavior::StartTls).await;
    let sut = service(relay.addr.port(), true);

    let result = sut.send(email()).await;

    assert_matches!(result, Err(EmailSendError::Other(_)));
    let session = relay.session();
    assert_eq!(session.upgraded_after, Some(2));
    assert!(!session.commands.iter().any(|c| c.starts_with("AUTH")));
    assert!(session.messages.is_empty());
}

#[tokio::test]
async fn implicit_tls_starts_with_handshake() {
    let relay = FakeRelay::start(Behavior::Silent).await;

    let result = LettreSmtpTransport::default()
        .send(
            connection(relay.addr.port(), SmtpSecurity::ImplicitTls),
            message(),
        )
        .await;

    assert!(result.is_err());
    let raw = relay.session().raw;
    // TLS record type 22 (handshake): the client speaks first, no SMTP greeting awaited
    assert_eq!(raw.first(), Some(&0x16), "{raw:?}");
}

#[tokio::test]
async fn connection_refused() {
    let sut = service(closed_port().await, false);

    let result = sut.send(email()).await;

    assert_matches!(result, Err(EmailSendError::Other(_)));
}

#[tokio::test]
async fn not_configured_never_connects() {
    let relay = FakeRelay::start(Behavior::Smtp).await;
    let sut = EmailServiceImpl::new(
        LettreSmtpTransport::default(),
        EmailServiceConfig {
            password: Sensitive(String::new()),
            ..config(relay.addr.port(), false)
        },
    );

    let result = sut.send(email()).await;

    assert_matches!(result, Err(EmailSendError::NotConfigured));
    assert!(relay.session().commands.is_empty());
}

fn service(port: u16, starttls: bool) -> EmailServiceImpl<LettreSmtpTransport> {
    EmailServiceImpl::new(LettreSmtpTransport::default(), config(port, starttls))
}

fn config(port: u16, starttls: bool) -> EmailServiceConfig {
    EmailServiceConfig {
        host: "127.0.0.1".into(),
        port,
        username: "relay-user".into(),
        password: Sensitive("relay-password".into()),
        from: "no-reply@theowl.solutions".into(),
        starttls,
        timeout: Duration::from_secs(5),
    }
}

fn connection(port: u16, security: SmtpSecurity) -> SmtpConnection {
    SmtpConnection {
        host: "127.0.0.1".into(),
        port,
        security,
        username: "relay-user".into(),
        password: Sensitive("relay-password".into()),
        timeout: Duration::from_secs(5),
    }
}

fn email() -> Email {
    Email {
        recipient: "leads@theowl.solutions".parse().unwrap(),
        subject: "Nuevo lead OWL LATAM: Ana Gomez - Acme".into(),
        body: "Nombre: Ana\nPagina web: -\n".into(),
        reply_to: Some("ana@acme.com".parse().unwrap()),
    }
}

fn message() -> Message {
    Message::builder()
        .from("no-reply@theowl.solutions".parse().unwrap())
        .to("leads@theowl.solutions".parse().unwrap())
        .subject("Test")
        .body(String::from("Hello World!"))
        .unwrap()
}
