/// What a line of keyboard input asks the replay to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop before the next command.
    Quit,
    /// Anything unbound.
    Noop,
}

impl Action {
    pub fn from_key(input: &str) -> Self {
        match input.trim().to_ascii_lowercase().as_str() {
            "q" | "quit" | "exit" => Action::Quit,
            _ => Action::Noop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_keys() {
        assert_eq!(Action::from_key("q"), Action::Quit);
        assert_eq!(Action::from_key(" Quit\n"), Action::Quit);
        assert_eq!(Action::from_key("exit"), Action::Quit);
    }

    #[test]
    fn everything_else_is_noop() {
        assert_eq!(Action::from_key(""), Action::Noop);
        assert_eq!(Action::from_key("w"), Action::Noop);
    }
}
