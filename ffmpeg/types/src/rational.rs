/*!
    Rational numbers for time bases and frame rates.
*/

/**
    A rational number (numerator / denominator).

    Used for stream time bases (e.g. 1/90000) and frame rates (e.g. 30000/1001).
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rational {
    pub num: i32,
    pub den: i32,
}

impl Rational {
    /**
        Create a new rational number.
    */
    pub const fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }

    /**
        Returns the reciprocal, e.g. the time base of a frame rate.
    */
    pub const fn invert(self) -> Self {
        Self {
            num: self.den,
            den: self.num,
        }
    }

    /**
        Returns the value as a float, or zero for a zero denominator.
    */
    pub fn to_f64(self) -> f64 {
        if self.den == 0 {
            0.0
        } else {
            self.num as f64 / self.den as f64
        }
    }

    /**
        Convert a timestamp counted in this time base to seconds.
    */
    pub fn seconds(self, timestamp: i64) -> f64 {
        timestamp as f64 * self.to_f64()
    }
}
