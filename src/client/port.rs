//! Free local port discovery.

use std::net::TcpListener;
use std::ops::RangeInclusive;

use rand::Rng;

/// Default range probed when the user does not choose a port.
pub const DEFAULT_PORT_RANGE: RangeInclusive<u16> = 3000..=3100;

/// Default number of random probes.
pub const DEFAULT_ATTEMPTS: usize = 50;

/// Pick a random port in `range` that can currently be bound.
///
/// The probe listener is closed before returning, so the port is only
/// likely, not guaranteed, to still be free when the caller binds it.
pub fn find_free_port(range: RangeInclusive<u16>, attempts: usize) -> Option<u16> {
    let mut rng = rand::thread_rng();
    (0..attempts).find_map(|_| {
        let port = rng.gen_range(range.clone());
        TcpListener::bind(("0.0.0.0", port)).ok().map(|_| port)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_port_in_range() {
        let port = find_free_port(41000..=41100, 50).expect("no free port");
        assert!((41000..=41100).contains(&port));
    }

    #[test]
    fn test_occupied_single_port() {
        let taken = TcpListener::bind("0.0.0.0:0").unwrap();
        let port = taken.local_addr().unwrap().port();
        assert_eq!(find_free_port(port..=port, 5), None);
    }

    #[test]
    fn test_zero_attempts() {
        assert_eq!(find_free_port(DEFAULT_PORT_RANGE, 0), None);
    }
}
