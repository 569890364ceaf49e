//! Sentiment tallies and chart data.

use crate::models::{CanonicalResult, ChartData, NameCount, SentimentStats, Source};

/// Buckets sentiment labels. Labels are compared lower-cased; anything that
/// is not positive, negative or neutral counts as unknown, so the bucket total
/// always equals the number of labels.
pub fn aggregate<I, S>(sentiments: I) -> SentimentStats
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut stats = SentimentStats::default();
    for sentiment in sentiments {
        match sentiment.as_ref().to_lowercase().as_str() {
            "positive" => stats.positive += 1,
            "negative" => stats.negative += 1,
            "neutral" => stats.neutral += 1,
            _ => stats.unknown += 1,
        }
    }
    stats
}

/// Builds chart data from analysis results, optionally restricted to one
/// source.
///
/// Each emotion in a result's list counts once. Slices keep their order of
/// first appearance.
pub fn chart_from_results(results: &[CanonicalResult], source: Option<Source>) -> ChartData {
    let mut sentiments = Counter::default();
    let mut emotions = Counter::default();

    let selected = results
        .iter()
        .filter(|result| source.map_or(true, |wanted| result.source == wanted));

    for result in selected {
        sentiments.bump(result.sentiment.as_str());
        result.emotion.iter().for_each(|e| emotions.bump(e));
    }

    ChartData {
        sentiments: sentiments.0,
        emotions: emotions.0,
    }
}

#[derive(Default)]
struct Counter(Vec<NameCount>);

impl Counter {
    fn bump(&mut self, name: &str) {
        match self.0.iter_mut().find(|slot| slot.name == name) {
            Some(slot) => slot.count += 1,
            None => self.0.push(NameCount {
                name: name.to_string(),
                count: 1,
            }),
        }
    }
}
