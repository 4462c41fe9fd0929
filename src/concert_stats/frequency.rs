//! Artist visit counts derived from attendance history.

use super::models::AttendanceEntry;
use std::collections::{HashMap, HashSet};

/// How many times each artist was seen, in first-seen order.
///
/// Artists are keyed by the exact logged string, so "Metallica" and
/// "metallica" count separately. Lookups against the known set
/// ([`ArtistFrequency::known_artists`]) are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct ArtistFrequency {
    counts: Vec<(String, usize)>,
    total: usize,
}

impl ArtistFrequency {
    pub fn from_history(entries: &[AttendanceEntry]) -> Self {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<(String, usize)> = Vec::new();
        for entry in entries {
            match index.get(entry.artist.as_str()) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(entry.artist.as_str(), counts.len());
                    counts.push((entry.artist.clone(), 1));
                }
            }
        }
        Self {
            counts,
            total: entries.len(),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// `(artist, count)` pairs in first-seen order.
    pub fn artists(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(a, c)| (a.as_str(), *c))
    }

    /// The most-seen artist, only when its count strictly beats every other.
    pub fn favorite(&self) -> Option<&str> {
        let top = self.counts.iter().map(|(_, c)| *c).max()?;
        let mut leaders = self.counts.iter().filter(|(_, c)| *c == top);
        let leader = leaders.next()?;
        if leaders.next().is_some() {
            return None;
        }
        Some(leader.0.as_str())
    }

    /// Lowercased artist names, for case-insensitive membership checks.
    pub fn known_artists(&self) -> HashSet<String> {
        self.counts.iter().map(|(a, _)| a.to_lowercase()).collect()
    }

    pub fn summary_text(&self) -> String {
        let mut summary = format!(
            "You have attended {} {}.",
            self.total,
            concert_noun(self.total)
        );
        if let Some(favorite) = self.favorite() {
            summary.push_str(&format!(" Your most-seen artist so far is {}.", favorite));
        }
        summary
    }
}

pub(crate) fn concert_noun(count: usize) -> &'static str {
    if count == 1 {
        "concert"
    } else {
        "concerts"
    }
}
