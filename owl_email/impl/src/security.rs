/// How the connection to the relay is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSecurity {
    /// TLS from the first byte of the connection (SMTPS).
    ImplicitTls,
    /// Plain connection upgraded via `STARTTLS` after the first `EHLO`.
    StartTls,
    /// No encryption at all. Credentials are sent in the clear.
    Plain,
}

impl SmtpSecurity {
    /// The conventional port for mail submission over implicit TLS.
    pub const IMPLICIT_TLS_PORT: u16 = 465;

    pub fn select(port: u16, starttls: bool) -> Self {
        match (port, starttls) {
            (Self::IMPLICIT_TLS_PORT, false) => Self::ImplicitTls,
            (_, true) => Self::StartTls,
            (_, false) => Self::Plain,
        }
    }

    pub fn is_encrypted(self) -> bool {
        !matches!(self, Self::Plain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select() {
        for (port, starttls, expected) in [
            (465, false, SmtpSecurity::ImplicitTls),
            (465, true, SmtpSecurity::StartTls),
            (587, true, SmtpSecurity::StartTls),
            (25, true, SmtpSecurity::StartTls),
            (587, false, SmtpSecurity::Plain),
            (25, false, SmtpSecurity::Plain),
            (2525, false, SmtpSecurity::Plain),
        ] {
            assert_eq!(
                SmtpSecurity::select(port, starttls),
                expected,
                "port={port} starttls={starttls}"
            );
        }
    }

    #[test]
    fn is_encrypted() {
        assert!(SmtpSecurity::ImplicitTls.is_encrypted());
        assert!(SmtpSecurity::StartTls.is_encrypted());
        assert!(!SmtpSecurity::Plain.is_encrypted());
    }
}
