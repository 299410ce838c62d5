//! Built-in port catalogs for bulk candidate expansion.
//!
//! A catalog is a named, fixed, ordered list of ports. Candidates are
//! generated for every port in catalog order, once for http and once for
//! https. The tables are immutable static data; lookups never fail loudly.
//! An unknown name simply falls through to literal `protocol:port` parsing
//! in the candidate generator.

/// Ports probed by the `large` catalog.
pub const LARGE_PORTS: &[u16] = &[
    81, 591, 2082, 2087, 2095, 2096, 3000, 8000, 8001, 8008, 8080, 8083, 8443, 8834, 8888,
];

/// Ports probed by the `xlarge` catalog.
pub const XLARGE_PORTS: &[u16] = &[
    81, 300, 591, 593, 832, 981, 1010, 1311, 2082, 2087, 2095, 2096, 2480, 3000, 3128, 3333,
    4243, 4567, 4711, 4712, 4993, 5000, 5104, 5108, 5800, 6543, 7000, 7396, 7474, 8000, 8001,
    8008, 8014, 8042, 8069, 8080, 8081, 8088, 8090, 8091, 8118, 8123, 8172, 8222, 8243, 8280,
    8281, 8333, 8443, 8500, 8834, 8880, 8888, 8983, 9000, 9043, 9060, 9080, 9090, 9091, 9200,
    9443, 9800, 9981, 12443, 16080, 18091, 18092, 20720, 28017,
];

/// Look up a built-in catalog by name.
///
/// Matching is exact and case-sensitive. Returns `None` for unknown names,
/// letting the caller treat the token as a literal `protocol:port` spec.
pub fn catalog_ports(name: &str) -> Option<&'static [u16]> {
    match name {
        "large" => Some(LARGE_PORTS),
        "xlarge" => Some(XLARGE_PORTS),
        _ => None,
    }
}

/// Names of all built-in catalogs, for help text and diagnostics.
pub fn available_catalogs() -> &'static [&'static str] {
    &["large", "xlarge"]
}
