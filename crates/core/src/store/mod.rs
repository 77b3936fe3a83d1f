use crate::{capture::Point, palette::TrailColor};

/// An immutable captured cursor path.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    id: u64,
    points: Vec<Point>,
    color: TrailColor,
    name: String,
}

impl Recording {
    /// Builds a recording, or `None` if `points` is empty or out of order.
    pub fn new(id: u64, points: Vec<Point>, color: TrailColor, name: impl Into<String>) -> Option<Self> {
        if points.is_empty() || points.windows(2).any(|w| w[0].timestamp > w[1].timestamp) {
            return None;
        }
        Some(Self {
            id,
            points,
            color,
            name: name.into(),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn color(&self) -> &TrailColor {
        &self.color
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn first_timestamp(&self) -> u64 {
        self.points[0].timestamp
    }

    pub fn last_timestamp(&self) -> u64 {
        self.points[self.points.len() - 1].timestamp
    }
}

/// Ordered collection of finished recordings.
#[derive(Debug, Default, Clone)]
pub struct RecordingStore {
    recordings: Vec<Recording>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.recordings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recordings.is_empty()
    }

    pub fn recordings(&self) -> &[Recording] {
        &self.recordings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Recording> {
        self.recordings.iter()
    }

    /// Name given to the next recording added to the store.
    pub fn next_name(&self) -> String {
        format!("Dance {}", self.recordings.len() + 1)
    }

    /// Materializes `points` into a new recording and appends it.
    ///
    /// `id` is bumped past the previous recording's id so ids stay unique even
    /// when two recordings finish within the same millisecond.
    pub fn commit(&mut self, points: Vec<Point>, color: TrailColor, id: u64) -> Option<&Recording> {
        let id = match self.recordings.last() {
            Some(last) if last.id >= id => last.id + 1,
            _ => id,
        };
        let recording = Recording::new(id, points, color, self.next_name())?;
        self.recordings.push(recording);
        self.recordings.last()
    }

    pub fn clear(&mut self) {
        self.recordings.clear();
    }
}

impl<'a> IntoIterator for &'a RecordingStore {
    type Item = &'a Recording;
    type IntoIter = std::slice::Iter<'a, Recording>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(timestamps: &[u64]) -> Vec<Point> {
        timestamps
            .iter()
            .enumerate()
            .map(|(i, &t)| Point::new(i as f32, i as f32, t))
            .collect()
    }

    #[test]
    fn rejects_empty_and_unordered_points() {
        assert!(Recording::new(1, Vec::new(), TrailColor::default(), "x").is_none());
        assert!(Recording::new(1, points(&[5, 3]), TrailColor::default(), "x").is_none());
        assert!(Recording::new(1, points(&[3, 3, 4]), TrailColor::default(), "x").is_some());
    }

    #[test]
    fn names_count_up() {
        let mut store = RecordingStore::new();
        store.commit(points(&[1]), TrailColor::default(), 10);
        let second = store.commit(points(&[2]), TrailColor::default(), 20).unwrap();
        assert_eq!(second.name(), "Dance 2");
        assert_eq!(store.next_name(), "Dance 3");
    }

    #[test]
    fn ids_stay_unique() {
        let mut store = RecordingStore::new();
        store.commit(points(&[1]), TrailColor::default(), 10);
        store.commit(points(&[1]), TrailColor::default(), 10);
        let ids: Vec<_> = store.iter().map(Recording::id).collect();
        assert_eq!(ids, vec![10, 11]);
    }

    #[test]
    fn empty_commit_leaves_store_unchanged() {
        let mut store = RecordingStore::new();
        assert!(store.commit(Vec::new(), TrailColor::default(), 1).is_none());
        assert!(store.is_empty());
    }
}
