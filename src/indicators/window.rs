use std::collections::VecDeque;

//fixed-capacity window over the most recent values
#[derive(Debug, Clone)]
pub struct RollingWindow {
    values: VecDeque<f64>,
    capacity: usize,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        RollingWindow {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    //pushes a value, evicting the oldest one once full
    pub fn push(&mut self, value: f64) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    //mean of the window, only once it is full
    //summed afresh so the value depends on the current window alone
    pub fn mean(&self) -> Option<f64> {
        if self.is_full() {
            Some(self.values.iter().sum::<f64>() / self.capacity as f64)
        } else {
            None
        }
    }

    //population standard deviation of the window, only once it is full
    pub fn population_std_dev(&self) -> Option<f64> {
        let mean = self.mean()?;
        let variance = self
            .values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / self.capacity as f64;
        Some(variance.sqrt())
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_value() {
        let mut window = RollingWindow::new(3);
        for v in [1.0, 2.0, 3.0, 4.0] {
            window.push(v);
        }
        assert_eq!(window.len(), 3);
        assert_eq!(window.iter().copied().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
        assert_eq!(window.mean(), Some(3.0));
    }

    #[test]
    fn not_ready_until_full() {
        let mut window = RollingWindow::new(2);
        window.push(5.0);
        assert_eq!(window.mean(), None);
        assert_eq!(window.population_std_dev(), None);
    }

    #[test]
    fn evicted_values_leave_no_rounding_residue() {
        let mut window = RollingWindow::new(2);
        for v in [1e16, 1.0, 1.0] {
            window.push(v);
        }
        assert_eq!(window.mean(), Some(1.0));
    }

    #[test]
    fn population_std_dev_of_known_window() {
        let mut window = RollingWindow::new(8);
        for v in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            window.push(v);
        }
        assert_eq!(window.population_std_dev(), Some(2.0));
    }
}
