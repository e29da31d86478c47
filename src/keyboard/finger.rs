use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Finger {
    Pinky,
    Ring,
    Middle,
    Index,
    Thumb,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FingerAssignment {
    pub hand: Hand,
    pub finger: Finger,
}

impl FingerAssignment {
    pub fn new(hand: Hand, finger: Finger) -> Self {
        Self { hand, finger }
    }

    pub fn label(self) -> &'static str {
        use Finger::*;
        use Hand::*;

        match (self.hand, self.finger) {
            (Left, Pinky) => "left pinky",
            (Left, Ring) => "left ring",
            (Left, Middle) => "left middle",
            (Left, Index) => "left index",
            (Left, Thumb) => "left thumb",
            (Right, Index) => "right index",
            (Right, Middle) => "right middle",
            (Right, Ring) => "right ring",
            (Right, Pinky) => "right pinky",
            (Right, Thumb) => "right thumb",
        }
    }
}

/// The unshifted key that produces `ch` on a US QWERTY board.
pub fn base_key(ch: char) -> char {
    match ch {
        '~' => '`',
        '!' => '1',
        '@' => '2',
        '#' => '3',
        '$' => '4',
        '%' => '5',
        '^' => '6',
        '&' => '7',
        '*' => '8',
        '(' => '9',
        ')' => '0',
        '_' => '-',
        '+' => '=',
        '{' => '[',
        '}' => ']',
        '|' => '\\',
        ':' => ';',
        '"' => '\'',
        '<' => ',',
        '>' => '.',
        '?' => '/',
        c => c.to_ascii_lowercase(),
    }
}

/// Which finger should strike `ch`. Shifted characters map to the finger of
/// their base key. Returns `None` for characters not on the board.
pub fn qwerty_finger(ch: char) -> Option<FingerAssignment> {
    use Finger::*;
    use Hand::*;

    let assignment = match base_key(ch) {
        '`' | '1' | 'q' | 'a' | 'z' => FingerAssignment::new(Left, Pinky),
        '2' | 'w' | 's' | 'x' => FingerAssignment::new(Left, Ring),
        '3' | 'e' | 'd' | 'c' => FingerAssignment::new(Left, Middle),
        '4' | '5' | 'r' | 't' | 'f' | 'g' | 'v' | 'b' => FingerAssignment::new(Left, Index),
        '6' | '7' | 'y' | 'u' | 'h' | 'j' | 'n' | 'm' => FingerAssignment::new(Right, Index),
        '8' | 'i' | 'k' | ',' => FingerAssignment::new(Right, Middle),
        '9' | 'o' | 'l' | '.' => FingerAssignment::new(Right, Ring),
        '0' | '-' | '=' | 'p' | '[' | ']' | '\\' | ';' | '\'' | '/' => {
            FingerAssignment::new(Right, Pinky)
        }
        ' ' => FingerAssignment::new(Right, Thumb),
        _ => return None,
    };
    Some(assignment)
}

/// Whether `ch` needs Shift held on a US QWERTY board.
pub fn needs_shift(ch: char) -> bool {
    ch.is_ascii_uppercase() || (base_key(ch) != ch && !ch.is_ascii_alphabetic())
}
