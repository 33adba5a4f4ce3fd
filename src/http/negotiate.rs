//! Content negotiation — quality-weighted `Accept*` header parsing.
//!
//! An Accept-style header value such as `en-us,en;q=0.5` becomes an ordered
//! token → weight mapping. Tokens without an explicit `q` parameter weigh
//! 1.0, an absent or empty header falls back entirely to the caller's
//! defaults, and defaults also fill in any token the header does not
//! mention.

/// An ordered mapping from negotiation token to quality weight.
///
/// Entries are sorted by descending weight; ties keep parse order, with
/// defaults after header-supplied tokens.
///
/// # Examples
///
/// ```
/// use courier::http::Accept;
///
/// let accept = Accept::parse(Some("en-us,en;q=0.5"), &[("en-us", 1.0)]);
/// assert_eq!(accept.quality("en-us"), Some(1.0));
/// assert_eq!(accept.quality("en"), Some(0.5));
/// assert_eq!(accept.preferred(), Some("en-us"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Accept {
    entries: Vec<(String, f32)>,
}

impl Accept {
    /// Parses a raw header value, merging in `defaults` for any token the
    /// header does not mention.
    ///
    /// Tokens are lowercased. A malformed or missing `q` parameter falls
    /// back to 1.0; weights are clamped to `0.0..=1.0`.
    pub fn parse(header: Option<&str>, defaults: &[(&str, f32)]) -> Accept {
        let mut entries: Vec<(String, f32)> = Vec::new();

        if let Some(raw) = header {
            for part in raw.split(',') {
                let part = part.trim();
                if part.is_empty() {
                    continue;
                }

                let mut pieces = part.split(';');
                let token = pieces.next().unwrap_or("").trim().to_ascii_lowercase();
                if token.is_empty() {
                    continue;
                }

                let mut weight = 1.0f32;
                for piece in pieces {
                    if let Some(q) = piece.trim().strip_prefix("q=") {
                        // malformed weight falls back to the default of 1.0
                        weight = q.trim().parse().unwrap_or(1.0);
                    }
                }

                if !entries.iter().any(|(t, _)| *t == token) {
                    entries.push((token, weight.clamp(0.0, 1.0)));
                }
            }
        }

        for (token, weight) in defaults {
            let token = token.to_ascii_lowercase();
            if !entries.iter().any(|(t, _)| *t == token) {
                entries.push((token, *weight));
            }
        }

        // stable: equal weights keep parse order
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));

        Accept { entries }
    }

    /// Returns the weight for `token` (case-insensitive), or `None` if the
    /// token was neither sent nor defaulted.
    pub fn quality(&self, token: &str) -> Option<f32> {
        let token = token.to_ascii_lowercase();
        self.entries
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, q)| *q)
    }

    /// Returns the highest-weighted token, if any.
    pub fn preferred(&self) -> Option<&str> {
        self.entries.first().map(|(t, _)| t.as_str())
    }

    /// Iterates over `(token, weight)` pairs in descending weight order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.entries.iter().map(|(t, q)| (t.as_str(), *q))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
