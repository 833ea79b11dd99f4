use rand::{rngs::StdRng, SeedableRng};

use crate::{
    config::{self, InteractionMode, Settings},
    frequency::FrequencyStore,
    layout,
    render::{self, DrawSink, Projection},
    rotation::{self, RotationController},
    types::{Angles, CloudStats, Vec2, Word},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    LayoutRecomputed { count: usize },
    StatsChanged { distinct_word_count: usize },
}

const SAMPLE_WORDS: [&str; 50] = [
    "dream", "hope", "courage", "love", "freedom", "joy", "peace", "friendship", "beauty",
    "future", "create", "explore", "growth", "persist", "belief", "wisdom", "strength", "light",
    "truth", "justice", "kindness", "grace", "success", "happiness", "harmony", "innovate",
    "progress", "strive", "endure", "transcend", "gratitude", "tolerance", "understand",
    "respect", "trust", "duty", "mission", "value", "meaning", "goal", "ideal", "passion",
    "warmth", "focus", "craft", "excel", "perfect", "refine", "subtle", "elegance",
];

const SAMPLE_FREQUENCIES: [(&str, u32); 9] = [
    ("dream", 8),
    ("hope", 6),
    ("love", 7),
    ("courage", 5),
    ("freedom", 4),
    ("joy", 5),
    ("growth", 4),
    ("success", 6),
    ("happiness", 5),
];

/// All word-cloud state: words, counts, rotation and the viewport they are projected into.
pub struct Session {
    words: Vec<Word>,
    store: FrequencyStore,
    rotation: RotationController,
    events: Vec<Event>,
    mode: InteractionMode,
    radius: f32,
    perspective: f32,
    viewport: Vec2,
    center: Vec2,
}

impl Session {
    pub fn new(settings: &Settings, now_ms: f64) -> Self {
        let rng = match settings.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut session = Self {
            words: Vec::new(),
            store: FrequencyStore::new(),
            rotation: RotationController::new(settings.auto_rotate_speed, now_ms, rng),
            events: Vec::new(),
            mode: settings.interaction_mode,
            radius: settings.radius,
            perspective: settings.perspective,
            viewport: Vec2::ZERO,
            center: Vec2::ZERO,
        };
        if settings.seed_samples {
            session.seed_samples();
        }
        tracing::info!(
            words = session.words.len(),
            mode = ?session.mode,
            "session started"
        );
        session
    }

    /// Records one submission. Blank input is ignored; a new word redistributes every word.
    pub fn add_word(&mut self, text: &str) {
        let Some(occurrence) = self.store.record_occurrence(text) else {
            return;
        };
        if occurrence.is_new {
            let word = Word::new(text.trim().to_string(), occurrence.insertion_index);
            tracing::debug!(word = %word.text, index = word.insertion_index, "new word");
            self.words.push(word);
            self.redistribute();
        } else {
            tracing::debug!(word = text.trim(), frequency = occurrence.frequency, "word repeated");
        }
        self.push_stats();
    }

    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
        self.center = self.viewport * 0.5;
    }

    pub fn set_pointer_position(&mut self, x: f32, y: f32) {
        let pointer = Vec2::new(x, y);
        match self.mode {
            InteractionMode::HoverPause => {
                let inside = rotation::is_inside_sphere(pointer, self.center, self.radius);
                self.rotation.set_hover(inside);
            }
            InteractionMode::PointerRotate => {
                self.rotation.set_manual_target(self.pointer_target(pointer));
            }
        }
    }

    pub fn clear_pointer(&mut self) {
        self.rotation.set_hover(false);
    }

    /// One animation frame: advance rotation, then project every word into `sink`.
    pub fn tick(&mut self, now_ms: f64, sink: &mut impl DrawSink) {
        let rotation = self.rotation.advance(now_ms);
        let projection = Projection {
            center: self.center,
            perspective: self.perspective,
        };
        sink.begin_frame();
        for word in &self.words {
            // a word missing from the store still draws, at the base size
            let frequency = self.store.frequency(&word.text).unwrap_or(1);
            let command = render::project(
                &word.text,
                word.position,
                rotation,
                frequency,
                word.base_hue,
                projection,
            );
            sink.draw(&command);
        }
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn stats(&self) -> CloudStats {
        CloudStats {
            distinct_word_count: self.store.total_distinct_count(),
        }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn frequency(&self, text: &str) -> Option<u32> {
        self.store.frequency(text)
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn rotation(&self) -> &RotationController {
        &self.rotation
    }

    fn seed_samples(&mut self) {
        for text in SAMPLE_WORDS {
            if let Some(occurrence) = self.store.record_occurrence(text) {
                if occurrence.is_new {
                    self.words.push(Word::new(text.to_string(), occurrence.insertion_index));
                }
            }
        }
        for (text, frequency) in SAMPLE_FREQUENCIES {
            self.store.raise_to(text, frequency);
        }
        self.redistribute();
        self.push_stats();
    }

    fn redistribute(&mut self) {
        let positions = layout::compute_positions(self.words.len(), self.radius);
        for (word, position) in self.words.iter_mut().zip(positions) {
            word.position = position;
        }
        tracing::debug!(count = self.words.len(), "layout recomputed");
        self.events.push(Event::LayoutRecomputed {
            count: self.words.len(),
        });
    }

    fn push_stats(&mut self) {
        self.events.push(Event::StatsChanged {
            distinct_word_count: self.store.total_distinct_count(),
        });
    }

    /// Maps the pointer's offset from center, normalized by the half-viewport, to a tilt.
    fn pointer_target(&self, pointer: Vec2) -> Angles {
        let half = self.viewport * 0.5;
        if half.x <= 0.0 || half.y <= 0.0 {
            return Angles::ZERO;
        }
        let offset = pointer - self.center;
        let limit = config::POINTER_ROTATE_LIMIT;
        Angles::new(
            (offset.y / half.y * limit).clamp(-limit, limit),
            (offset.x / half.x * limit).clamp(-limit, limit),
        )
    }
}
