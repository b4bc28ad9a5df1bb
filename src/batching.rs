/*!
 * Batch planning for translation requests.
 *
 * The remote service accepts many strings per request but bills and limits by
 * character count, so catalog entries are grouped into request batches before
 * dispatch. The planner works in a single forward pass over the entries,
 * cutting whenever the next entry would push the open batch past the hard
 * ceiling and preferring cut points near multiples of the soft minimum.
 */

use std::ops::Range;
use log::{error, warn, debug};

use crate::errors::ConfigError;

/// One translatable string, identified by its position in the input slice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUnit {
    /// The untranslated source text
    pub text: String,
}

impl TranslationUnit {
    /// Create a unit from any string-like value
    pub fn new(text: impl Into<String>) -> Self {
        TranslationUnit { text: text.into() }
    }

    /// Character count as the remote service bills it (Unicode scalars, not bytes)
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

impl From<&str> for TranslationUnit {
    fn from(text: &str) -> Self {
        TranslationUnit::new(text)
    }
}

impl From<String> for TranslationUnit {
    fn from(text: String) -> Self {
        TranslationUnit { text }
    }
}

/// Validated character limits for a single translation request
///
/// The soft minimum is the size the service recommends per request; the hard
/// maximum is the size it rejects. Both come from the provider configuration
/// and are checked once here so planning itself never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    min_chars: usize,
    max_chars: usize,
}

impl BatchLimits {
    /// Create a limit pair, rejecting degenerate configurations
    pub fn new(min_chars: usize, max_chars: usize) -> Result<Self, ConfigError> {
        if min_chars == 0 || max_chars == 0 {
            return Err(ConfigError::NonPositiveLimit { min: min_chars, max: max_chars });
        }
        if min_chars >= max_chars {
            return Err(ConfigError::LimitOrder { min: min_chars, max: max_chars });
        }
        Ok(BatchLimits { min_chars, max_chars })
    }

    /// Soft minimum characters per request
    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    /// Hard maximum characters per request
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }
}

impl Default for BatchLimits {
    /// The service's documented recommended and maximum request sizes
    fn default() -> Self {
        BatchLimits { min_chars: 5000, max_chars: 30000 }
    }
}

/// One planned batch: a contiguous index range over the input units
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSpan {
    /// Half-open range of unit indices covered by this batch
    pub range: Range<usize>,
    /// Total character count of the covered units
    pub char_count: usize,
}

impl BatchSpan {
    /// Number of units in this batch
    pub fn unit_count(&self) -> usize {
        self.range.len()
    }
}

/// Partition `units` into ordered, contiguous request batches
///
/// Every unit lands in exactly one batch and batches preserve input order.
/// No batch exceeds `max_chars` unless it holds a single entry that is
/// itself longer than the ceiling; such entries cannot be split, so they are
/// isolated into their own batch and a warning is logged.
pub fn plan_batches(units: &[TranslationUnit], limits: BatchLimits) -> Vec<BatchSpan> {
    if units.is_empty() {
        return Vec::new();
    }

    let min = limits.min_chars();
    let max = limits.max_chars();

    // Cumulative character counts; prefix[i] is the total before unit i.
    let mut prefix = Vec::with_capacity(units.len() + 1);
    let mut total = 0usize;
    prefix.push(0);
    for unit in units {
        total += unit.char_count();
        prefix.push(total);
    }

    let mut spans: Vec<BatchSpan> = Vec::new();
    let mut start = 0usize;
    let mut acc = 0usize;
    let mut tier = 1usize;
    let mut candidate: Option<usize> = None;

    for idx in 0..units.len() {
        let len = prefix[idx + 1] - prefix[idx];

        if len > max {
            // A single entry longer than the request ceiling cannot be split;
            // close whatever is open and send it alone.
            warn!(
                "Entry {} is {} chars, over the {} char request ceiling; sending it in its own batch",
                idx, len, max
            );
            if idx > start {
                spans.push(BatchSpan { range: start..idx, char_count: acc });
            }
            spans.push(BatchSpan { range: idx..idx + 1, char_count: len });
            start = idx + 1;
            acc = 0;
            tier = 1;
            candidate = None;
            continue;
        }

        // Emit before the accumulation passes the ceiling, preferring the most
        // recent soft cut so batches land near the min_chars multiples rather
        // than right at max_chars. The remainder after a candidate cut carries
        // over and is re-checked, so a long tail cannot push a batch over.
        while acc > 0 && acc + len > max {
            let cut = candidate.take().unwrap_or(idx);
            spans.push(BatchSpan { range: start..cut, char_count: prefix[cut] - prefix[start] });
            start = cut;
            acc = prefix[idx] - prefix[cut];
            tier = acc / min + 1;
        }

        acc += len;
        if acc >= tier * min {
            // Crossed the next multiple of the soft minimum: remember this
            // position as the preferred cut for when the ceiling is reached.
            candidate = Some(idx + 1);
            tier = acc / min + 1;
        }
    }

    // Trailing batch for whatever is still open after the scan.
    if start < units.len() {
        spans.push(BatchSpan { range: start..units.len(), char_count: total - prefix[start] });
    }

    let planned: usize = spans.iter().map(BatchSpan::unit_count).sum();
    if planned != units.len() {
        error!(
            "Lost entries during batch planning! Input: {}, planned: {}",
            units.len(), planned
        );
    } else if log::max_level() >= log::LevelFilter::Debug {
        for (i, span) in spans.iter().enumerate() {
            debug!(
                "Batch {}: units {}..{} ({} chars)",
                i + 1, span.range.start, span.range.end, span.char_count
            );
        }
    }

    spans
}
