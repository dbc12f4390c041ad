//! Plain-text dataset import
//!
//! Parses the raw export format into a [`RailNetwork`]:
//!
//! ```text
//! <station_count> <railway_count>
//! per station: <code> <railway_id> <name> <platform_count>
//!              then per platform: <n> followed by n coordinate pairs
//! <path_count>
//! per path:    <railway_id> <n> followed by n coordinate pairs
//! ```
//!
//! Tokens are whitespace-separated. Coordinates are (lat, lng) pairs of
//! fixed-precision decimal tokens `<intPart><nonDigit><fracDigits>`, whose
//! value is `intPart + fracDigits * 1e-5`. The reconstruction is applied
//! identically everywhere so that equal tokens yield bit-identical doubles;
//! coordinate equality downstream depends on this.

use crate::constants::COORDINATE_SCALE;
use crate::geometry::{Polyline, Pos};
use crate::models::{RailNetwork, Station};

/// Reconstruct a fixed-precision decimal token.
///
/// The integer part (with its sign) and the fraction digits are parsed
/// separately and recombined as `intPart + fracDigits * 1e-5`, matching the
/// raw export convention. A token without a separator is a whole number.
///
/// # Errors
/// Returns an error when either part fails to parse as an integer.
pub fn parse_decimal(token: &str) -> Result<f64, String> {
    let digits_from = usize::from(token.starts_with('-'));
    let sep = token[digits_from..]
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(at, c)| (digits_from + at, c.len_utf8()));
    let (int_part, frac_part) = match sep {
        Some((at, len)) => (&token[..at], &token[at + len..]),
        None => (token, ""),
    };
    let int_val: i64 = int_part
        .parse()
        .map_err(|_| format!("invalid coordinate token '{token}'"))?;
    let frac_val: u64 = if frac_part.is_empty() {
        0
    } else {
        frac_part
            .parse()
            .map_err(|_| format!("invalid coordinate fraction in '{token}'"))?
    };
    #[allow(clippy::cast_precision_loss)]
    let value = int_val as f64 + frac_val as f64 * COORDINATE_SCALE;
    Ok(value)
}

struct Tokens<'a> {
    inner: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            inner: content.split_whitespace(),
        }
    }

    fn next(&mut self, what: &str) -> Result<&'a str, String> {
        self.inner
            .next()
            .ok_or_else(|| format!("unexpected end of input while reading {what}"))
    }

    fn count(&mut self, what: &str) -> Result<usize, String> {
        let token = self.next(what)?;
        token
            .parse()
            .map_err(|_| format!("invalid {what} '{token}'"))
    }

    fn id(&mut self, what: &str) -> Result<u32, String> {
        let token = self.next(what)?;
        token
            .parse()
            .map_err(|_| format!("invalid {what} '{token}'"))
    }

    fn pos(&mut self, what: &str) -> Result<Pos, String> {
        let lat = parse_decimal(self.next(what)?)?;
        let lng = parse_decimal(self.next(what)?)?;
        Ok(Pos::new(lat, lng))
    }

    fn polyline(&mut self, what: &str, min_len: usize) -> Result<Polyline, String> {
        let len = self.count(what)?;
        if len < min_len {
            return Err(format!("{what} has {len} vertices, minimum is {min_len}"));
        }
        (0..len).map(|_| self.pos(what)).collect()
    }
}

/// Parse the full dataset.
///
/// # Errors
/// Returns an error naming the first malformed or missing token.
pub fn parse_dataset(content: &str) -> Result<RailNetwork, String> {
    let mut tokens = Tokens::new(content);
    let mut net = RailNetwork::default();

    let station_count = tokens.count("station count")?;
    let _railway_count = tokens.count("railway count")?;

    for _ in 0..station_count {
        let code = tokens.id("station code")?;
        let railway_id = tokens.id("railway id")?;
        let name = tokens.next("station name")?.to_string();
        let platform_count = tokens.count("platform count")?;
        let platforms = (0..platform_count)
            .map(|_| tokens.polyline("platform polyline", 1))
            .collect::<Result<Vec<Polyline>, String>>()?;
        net.stations.push(Station {
            code,
            railway_id,
            name,
            platforms,
        });
    }

    let path_count = tokens.count("path count")?;
    for _ in 0..path_count {
        let railway_id = tokens.id("railway id")?;
        let path = tokens.polyline("track polyline", 2)?;
        net.railway_paths.entry(railway_id).or_default().push(path);
    }

    Ok(net)
}
