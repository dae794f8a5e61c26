use crate::components::player::Position;

pub trait Distance {
    fn distance(&self, other: &Self) -> f32;
}

impl Distance for Position {
    fn distance(&self, other: &Self) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}
