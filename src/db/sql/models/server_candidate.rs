use std::fmt;
use std::str::FromStr;

/// One database endpoint to try, as written in `DB_SERVERS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerCandidate {
    pub host: String,
    pub port: Option<u16>,
}

impl ServerCandidate {
    pub fn new(host: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl FromStr for ServerCandidate {
    type Err = String;

    /// Accepts `host,port`, `host:port`, `[ipv6]:port`, `[ipv6]` or a bare `host`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty server address".to_string());
        }

        let (host, port) = match s.split_once(',') {
            Some((host, port)) => {
                let host = host.trim();
                let host = host
                    .strip_prefix('[')
                    .and_then(|h| h.strip_suffix(']'))
                    .unwrap_or(host);
                (host, Some(port))
            }
            None if s.starts_with('[') => match s[1..].split_once(']') {
                Some((host, "")) => (host, None),
                Some((host, rest)) => match rest.strip_prefix(':') {
                    Some(port) => (host, Some(port)),
                    None => return Err(format!("invalid server address '{}'", s)),
                },
                None => return Err(format!("unterminated '[' in server address '{}'", s)),
            },
            // More than one ':' is an IPv6 literal without a port
            None if s.matches(':').count() == 1 => match s.split_once(':') {
                Some((host, port)) => (host, Some(port)),
                None => (s, None),
            },
            None => (s, None),
        };

        let host = host.trim();
        if host.is_empty() {
            return Err(format!("missing host in server address '{}'", s));
        }

        let port = match port {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u16>()
                    .map_err(|_| format!("invalid port in server address '{}'", s))?,
            ),
            None => None,
        };

        Ok(ServerCandidate::new(host, port))
    }
}

impl fmt::Display for ServerCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{},{}", self.host, port),
            None => write!(f, "{}", self.host),
        }
    }
}

/// Parses a `;`-separated candidate list, keeping its order.
pub fn parse_server_list(raw: &str) -> Result<Vec<ServerCandidate>, String> {
    raw.split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ServerCandidate::from_str)
        .collect()
}
