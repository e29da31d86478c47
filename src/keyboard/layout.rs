/// US QWERTY rows as drawn on the on-screen keyboard, unshifted.
pub const QWERTY_ROWS: &[&[char]] = &[
    &['`', '1', '2', '3', '4', '5', '6', '7', '8', '9', '0', '-', '='],
    &['q', 'w', 'e', 'r', 't', 'y', 'u', 'i', 'o', 'p', '[', ']', '\\'],
    &['a', 's', 'd', 'f', 'g', 'h', 'j', 'k', 'l', ';', '\''],
    &['z', 'x', 'c', 'v', 'b', 'n', 'm', ',', '.', '/'],
];

/// Left indent of each row, in key widths, to mimic the physical stagger.
pub const ROW_STAGGER: &[u16] = &[0, 1, 2, 3];

/// Row and column of the key producing `ch`, if it is drawn.
pub fn position_of(ch: char) -> Option<(usize, usize)> {
    let key = super::finger::base_key(ch);
    QWERTY_ROWS
        .iter()
        .enumerate()
        .find_map(|(row, keys)| keys.iter().position(|&k| k == key).map(|col| (row, col)))
}
