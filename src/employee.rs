use std::fmt;

/// A plain record with a name and an age.
///
/// The age is not validated; negative values are stored as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Employee {
    name: String,
    age: i32,
}

impl Employee {
    pub fn new(name: impl Into<String>, age: i32) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn set_age(&mut self, age: i32) {
        self.age = age;
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.age)
    }
}

/// The four employees every demo section works on, in insertion order.
pub fn sample_roster() -> Vec<Employee> {
    vec![
        Employee::new("Jimmy Quartz", 44),
        Employee::new("Bob Diamond", 12),
        Employee::new("Clive Ruby", 33),
        Employee::new("Alex Crystal", 27),
    ]
}
