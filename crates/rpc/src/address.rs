use std::fmt;
use std::str::FromStr;

use donkey_engine::Error;
use donkey_runtime::{DEFAULT_HOST, DEFAULT_PORT};

/// `host:port` of a donkey server.
///
/// Accepts `host`, `host:port`, `:port`, `[v6]`, `[v6]:port` and the empty
/// string. Missing parts take the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkAddress {
    host: String,
    port: u16,
}

impl Default for NetworkAddress {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl NetworkAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    fn split(s: &str) -> Result<(&str, Option<&str>), Error> {
        if let Some(rest) = s.strip_prefix('[') {
            let (host, tail) = rest
                .split_once(']')
                .ok_or_else(|| Error::invalid_argument(format!("unterminated '[' in {s:?}")))?;
            return match tail {
                "" => Ok((host, None)),
                _ => match tail.strip_prefix(':') {
                    Some(port) => Ok((host, Some(port))),
                    None => Err(Error::invalid_argument(format!(
                        "unexpected {tail:?} after ']' in {s:?}"
                    ))),
                },
            };
        }

        match s.rsplit_once(':') {
            // A bare IPv6 literal has several colons and no port.
            Some((host, _)) if host.contains(':') => Ok((s, None)),
            Some((host, port)) => Ok((host, Some(port))),
            None => Ok((s, None)),
        }
    }
}

impl FromStr for NetworkAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (host, port) = Self::split(s)?;

        let host = match host {
            "" => DEFAULT_HOST.to_string(),
            h => h.to_string(),
        };

        let port = match port {
            None | Some("") => DEFAULT_PORT,
            Some(p) => p
                .parse::<u16>()
                .map_err(|_| Error::invalid_argument(format!("invalid port {p:?} in {s:?}")))?,
        };

        Ok(Self { host, port })
    }
}

impl fmt::Display for NetworkAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

#[cfg(test)]
#[path = "address_tests.rs"]
mod tests;
