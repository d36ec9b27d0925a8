//! CIDR parsing and containment.

use std::net::IpAddr;
use std::str::FromStr;

use super::error::SelectorError;

/// A parsed `address/prefix` block. Host bits are masked off on parse, so
/// `10.1.2.3/8` and `10.0.0.0/8` compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cidr {
    network: IpAddr,
    prefix: u8,
}

impl Cidr {
    pub fn network(&self) -> IpAddr {
        self.network
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn contains(&self, ip: &IpAddr) -> bool {
        match (self.network, ip) {
            (IpAddr::V4(net), IpAddr::V4(ip)) => {
                let mask = v4_mask(self.prefix);
                u32::from(*ip) & mask == u32::from(net)
            }
            (IpAddr::V6(net), IpAddr::V6(ip)) => {
                let mask = v6_mask(self.prefix);
                u128::from(*ip) & mask == u128::from(net)
            }
            _ => false,
        }
    }

    /// True if `other` lies entirely inside this block.
    pub fn contains_cidr(&self, other: &Cidr) -> bool {
        other.prefix >= self.prefix && self.contains(&other.network)
    }
}

impl FromStr for Cidr {
    type Err = SelectorError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| SelectorError::InvalidCidr {
            cidr: raw.to_string(),
            reason: reason.to_string(),
        };

        let (addr, prefix) = raw
            .trim()
            .split_once('/')
            .ok_or_else(|| invalid("missing prefix length"))?;
        let addr: IpAddr = addr.parse().map_err(|_| invalid("bad address"))?;
        let prefix: u8 = prefix.parse().map_err(|_| invalid("bad prefix length"))?;

        let network = match addr {
            IpAddr::V4(v4) => {
                if prefix > 32 {
                    return Err(invalid("prefix length exceeds 32"));
                }
                IpAddr::V4((u32::from(v4) & v4_mask(prefix)).into())
            }
            IpAddr::V6(v6) => {
                if prefix > 128 {
                    return Err(invalid("prefix length exceeds 128"));
                }
                IpAddr::V6((u128::from(v6) & v6_mask(prefix)).into())
            }
        };
        Ok(Cidr { network, prefix })
    }
}

fn v4_mask(prefix: u8) -> u32 {
    if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - u32::from(prefix))
    }
}

fn v6_mask(prefix: u8) -> u128 {
    if prefix == 0 {
        0
    } else {
        u128::MAX << (128 - u32::from(prefix))
    }
}

pub fn parse_cidr(raw: &str) -> Result<Cidr, SelectorError> {
    raw.parse()
}

fn parse_ip(raw: &str) -> Result<IpAddr, SelectorError> {
    raw.trim()
        .parse()
        .map_err(|_| SelectorError::InvalidIp(raw.to_string()))
}

/// True if `ip` falls inside `block`.
pub fn matches_cidr(ip: &str, block: &str) -> Result<bool, SelectorError> {
    let ip = parse_ip(ip)?;
    Ok(parse_cidr(block)?.contains(&ip))
}

/// True if `ip` falls inside `block` and outside every `except` block.
pub fn matches_cidr_except<S: AsRef<str>>(
    ip: &str,
    block: &str,
    except: &[S],
) -> Result<bool, SelectorError> {
    let ip = parse_ip(ip)?;
    let block = parse_cidr(block)?;
    let except = except
        .iter()
        .map(|raw| parse_cidr(raw.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(block.contains(&ip) && !except.iter().any(|cidr| cidr.contains(&ip)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v4_containment() {
        assert_eq!(matches_cidr("10.1.2.3", "10.0.0.0/8"), Ok(true));
        assert_eq!(matches_cidr("11.1.2.3", "10.0.0.0/8"), Ok(false));
        assert_eq!(matches_cidr("192.168.1.1", "192.168.1.1/32"), Ok(true));
        assert_eq!(matches_cidr("8.8.8.8", "0.0.0.0/0"), Ok(true));
    }

    #[test]
    fn test_v6_containment() {
        assert_eq!(matches_cidr("2001:db8::1", "2001:db8::/32"), Ok(true));
        assert_eq!(matches_cidr("2001:db9::1", "2001:db8::/32"), Ok(false));
        assert_eq!(matches_cidr("::1", "::/0"), Ok(true));
    }

    #[test]
    fn test_mixed_families_never_match() {
        assert_eq!(matches_cidr("10.0.0.1", "::/0"), Ok(false));
        assert_eq!(matches_cidr("::1", "0.0.0.0/0"), Ok(false));
    }

    #[test]
    fn test_host_bits_masked() {
        assert_eq!(parse_cidr("10.1.2.3/8"), parse_cidr("10.0.0.0/8"));
        assert_eq!(parse_cidr("10.1.2.3/8").unwrap().prefix(), 8);
    }

    #[test]
    fn test_malformed_inputs_are_errors() {
        assert!(matches!(
            matches_cidr("10.0.0.1", "10.0.0.0"),
            Err(SelectorError::InvalidCidr { .. })
        ));
        assert!(matches!(
            matches_cidr("10.0.0.1", "10.0.0.0/33"),
            Err(SelectorError::InvalidCidr { .. })
        ));
        assert!(matches!(
            matches_cidr("10.0.0.1", "banana/8"),
            Err(SelectorError::InvalidCidr { .. })
        ));
        assert_eq!(
            matches_cidr("not-an-ip", "10.0.0.0/8"),
            Err(SelectorError::InvalidIp("not-an-ip".to_string()))
        );
    }

    #[test]
    fn test_except_list() {
        let except = ["10.1.0.0/16"];
        assert_eq!(matches_cidr_except("10.2.0.1", "10.0.0.0/8", &except), Ok(true));
        assert_eq!(matches_cidr_except("10.1.0.1", "10.0.0.0/8", &except), Ok(false));
        assert_eq!(matches_cidr_except("11.0.0.1", "10.0.0.0/8", &except), Ok(false));
        let none: [&str; 0] = [];
        assert_eq!(matches_cidr_except("10.1.0.1", "10.0.0.0/8", &none), Ok(true));
    }

    #[test]
    fn test_malformed_except_is_error() {
        assert!(matches_cidr_except("10.1.0.1", "10.0.0.0/8", &["garbage"]).is_err());
    }

    #[test]
    fn test_malformed_except_is_error_outside_block() {
        assert!(matches!(
            matches_cidr_except("11.0.0.1", "10.0.0.0/8", &["garbage"]),
            Err(SelectorError::InvalidCidr { .. })
        ));
    }

    #[test]
    fn test_malformed_except_after_match_is_error() {
        assert!(matches!(
            matches_cidr_except("10.1.0.1", "10.0.0.0/8", &["10.1.0.0/16", "garbage"]),
            Err(SelectorError::InvalidCidr { .. })
        ));
    }

    #[test]
    fn test_contains_cidr() {
        let block = parse_cidr("10.0.0.0/8").unwrap();
        assert!(block.contains_cidr(&parse_cidr("10.1.0.0/16").unwrap()));
        assert!(!block.contains_cidr(&parse_cidr("0.0.0.0/0").unwrap()));
        assert!(!block.contains_cidr(&parse_cidr("11.0.0.0/16").unwrap()));
    }
}
