use serde::{Deserialize, Serialize};

//direction of a fast/slow series crossing on the current bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cross {
    //fast moved from <= slow to > slow
    Up,
    //fast moved from >= slow to < slow
    Down,
    Flat,
}

impl Cross {
    //+1 / -1 / 0 signal encoding
    pub fn signal(&self) -> i8 {
        match self {
            Cross::Up => 1,
            Cross::Down => -1,
            Cross::Flat => 0,
        }
    }
}

//detects crossovers between two streamed series
//ready only after both inputs were ready on the previous and current bar
#[derive(Debug, Clone, Default)]
pub struct Crossover {
    prev: Option<(f64, f64)>,
    current: Option<Cross>,
}

impl Crossover {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, fast: Option<f64>, slow: Option<f64>) -> Option<Cross> {
        let now = fast.zip(slow);

        self.current = match (self.prev, now) {
            (Some((prev_fast, prev_slow)), Some((fast, slow))) => {
                if prev_fast <= prev_slow && fast > slow {
                    Some(Cross::Up)
                } else if prev_fast >= prev_slow && fast < slow {
                    Some(Cross::Down)
                } else {
                    Some(Cross::Flat)
                }
            }
            _ => None,
        };

        self.prev = now;
        self.current
    }

    pub fn current(&self) -> Option<Cross> {
        self.current
    }
}
