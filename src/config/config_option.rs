/// A configurable value, with a name and bounds used to validate requested values.
#[derive(Clone, Debug)]
pub struct ConfigOption<T> {
    pub name: &'static str,
    pub min: T,
    pub max: T,
    pub value: T,
}

impl<T: Clone> ConfigOption<T> {
    pub fn min_max(&self) -> (T, T) {
        (self.min.clone(), self.max.clone())
    }
}

impl<T: Clone + PartialOrd> ConfigOption<T> {
    /// Sets the value to `value` if within bounds, returning whether the value was set.
    pub fn set(&mut self, value: T) -> bool {
        match self.min <= value && value <= self.max {
            true => {
                self.value = value;
                true
            }
            false => false,
        }
    }
}

impl<T: Clone + PartialOrd + std::str::FromStr> ConfigOption<T> {
    /// Parses `request` and sets the value, if the request parses to a value within bounds.
    pub fn set_from_str(&mut self, request: &str) -> bool {
        match request.parse::<T>() {
            Ok(value) => self.set(value),
            Err(_) => false,
        }
    }
}
