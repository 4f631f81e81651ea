use std::collections::HashMap;

/// A binding for a chemistry-mode identifier: an element/compound symbol
/// with optional known molar mass and display name, used to drive
/// environment-extended identifier scanning and the molar-mass marker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ident {
    pub mass: Option<f64>,
    pub name: Option<String>,
    pub molar_mass_marker: bool,
}

impl Ident {
    pub fn new() -> Ident {
        Ident::default()
    }

    pub fn with_mass(mut self, mass: f64) -> Ident {
        self.mass = Some(mass);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Ident {
        self.name = Some(name.into());
        self
    }

    pub fn with_molar_mass_marker(mut self) -> Ident {
        self.molar_mass_marker = true;
        self
    }
}

/// A stack of scopes mapping identifier spellings to chemistry bindings.
///
/// A stack-of-frames pattern generalized from plain variable slots to the
/// multi-character identifiers the scanner needs to recognize greedily.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    frames: Vec<HashMap<String, Ident>>,
}

impl Environment {
    pub fn new() -> Environment {
        Environment { frames: vec![HashMap::new()] }
    }

    pub fn push(&mut self, frame: HashMap<String, Ident>) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub fn define(&mut self, name: impl Into<String>, ident: Ident) {
        self.frames
            .last_mut()
            .expect("environment stack is never empty")
            .insert(name.into(), ident);
    }

    /// Looks up an identifier by exact spelling, innermost frame first.
    pub fn lookup(&self, name: &str) -> Option<&Ident> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Whether any frame registers an element with a known molar mass,
    /// which activates the parser's chemistry-mode normalizations:
    /// symbol concatenation, ion exponents, the `M(·)` sentinel.
    pub fn has_chemistry_elements(&self) -> bool {
        self.frames.iter().any(|frame| frame.values().any(|ident| ident.mass.is_some()))
    }

    /// Whether any identifier bound in scope starts with `prefix`, used by
    /// the scanner to decide whether it is still worth extending a
    /// multi-character identifier match one more character.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.frames.iter().any(|frame| frame.keys().any(|key| key.starts_with(prefix)))
    }

    /// The longest identifier spelling that is both bound in scope and a
    /// prefix of `text`, used by the scanner to greedily recognize
    /// multi-character chemistry symbols (e.g. `Na`, `Cl`, `H2O`) instead of
    /// falling back to single-character identifiers.
    pub fn longest_prefix<'a>(&self, text: &'a str) -> Option<&'a str> {
        let mut best: Option<&str> = None;
        for frame in &self.frames {
            for key in frame.keys() {
                if text.starts_with(key.as_str()) {
                    if best.map_or(true, |b| key.len() > b.len()) {
                        best = Some(&text[..key.len()]);
                    }
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lookup_finds_innermost_binding() {
        let mut env = Environment::new();
        env.define("Na", Ident::new().with_mass(22.99));
        env.push(HashMap::new());
        env.define("Na", Ident::new().with_mass(0.0));
        assert_eq!(env.lookup("Na").unwrap().mass, Some(0.0));
        env.pop();
        assert_eq!(env.lookup("Na").unwrap().mass, Some(22.99));
    }

    #[test]
    fn longest_prefix_prefers_multi_character_symbol() {
        let mut env = Environment::new();
        env.define("N", Ident::new());
        env.define("Na", Ident::new());
        assert_eq!(env.longest_prefix("NaCl"), Some("Na"));
    }

    #[test]
    fn pop_never_empties_the_stack() {
        let mut env = Environment::new();
        env.pop();
        env.define("x", Ident::new());
        assert!(env.lookup("x").is_some());
    }
}
