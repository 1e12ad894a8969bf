/// Rows in a big digit
pub const HEIGHT: usize = 5;

const GLYPHS: [[&str; HEIGHT]; 10] = [
    ["###", "#.#", "#.#", "#.#", "###"],
    [".#.", "##.", ".#.", ".#.", "###"],
    ["###", "..#", "###", "#..", "###"],
    ["###", "..#", "###", "..#", "###"],
    ["#.#", "#.#", "###", "..#", "..#"],
    ["###", "#..", "###", "..#", "###"],
    ["###", "#..", "###", "#.#", "###"],
    ["###", "..#", ".#.", ".#.", ".#."],
    ["###", "#.#", "###", "#.#", "###"],
    ["###", "#.#", "###", "..#", "###"],
];

/// Renders `value` as block-character rows, each glyph pixel two cells wide.
pub fn big_number(value: u32) -> Vec<String> {
    let digits: Vec<usize> = value
        .to_string()
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| d as usize)
        .collect();

    (0..HEIGHT)
        .map(|row| {
            digits
                .iter()
                .map(|&d| {
                    GLYPHS[d][row]
                        .chars()
                        .map(|px| if px == '#' { "██" } else { "  " })
                        .collect::<String>()
                })
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect()
}
