pub mod bollinger;
pub mod crossover;
pub mod rsi;
pub mod sma;
pub mod window;

pub use bollinger::{Bands, BollingerBands};
pub use crossover::{Cross, Crossover};
pub use rsi::Rsi;
pub use sma::Sma;
pub use window::RollingWindow;

//indicator fed one value per bar
//current() is None until the warm-up window has been consumed
pub trait StreamingIndicator {
    type Output: Copy;

    //consumes the next value and returns the updated reading
    fn update(&mut self, value: f64) -> Option<Self::Output>;

    //returns the latest reading without consuming input
    fn current(&self) -> Option<Self::Output>;

    //number of values needed before the first reading
    fn warmup(&self) -> usize;

    fn is_ready(&self) -> bool {
        self.current().is_some()
    }
}
