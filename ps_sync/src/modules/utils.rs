/// The destination API rejects rich text fields longer than this.
pub const MAX_TEXT_LENGTH: usize = 2000;

/// Splits text into consecutive chunks of at most `max_length` characters.
///
/// Counting is per character, not per byte; the synchronized documents are
/// mostly Korean. Concatenating the result reproduces the input exactly, and
/// empty input yields no chunks.
pub fn chunk_text(text: &str, max_length: usize) -> Vec<String> {
    let characters: Vec<char> = text.chars().collect();
    characters
        .chunks(max_length)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn chunks_reassemble_to_the_input() {
        let text = "a".repeat(4500);
        let chunks = chunk_text(&text, MAX_TEXT_LENGTH);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), MAX_TEXT_LENGTH);
        assert_eq!(chunks[1].chars().count(), MAX_TEXT_LENGTH);
        assert_eq!(chunks[2].chars().count(), 500);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn every_chunk_but_the_last_is_full() {
        let chunks = chunk_text("abcdefg", 3);

        assert_eq!(chunks, vec!["abc", "def", "g"]);
    }

    #[test]
    fn korean_text_is_split_on_character_boundaries() {
        let text = "안녕하세요".repeat(3);
        let chunks = chunk_text(&text, 4);

        assert_eq!(chunks.concat(), text);
        for chunk in &chunks[..chunks.len() - 1] {
            assert_eq!(chunk.chars().count(), 4);
        }
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(chunk_text("", MAX_TEXT_LENGTH).is_empty());
    }

    #[test]
    fn short_input_is_a_single_chunk() {
        assert_eq!(chunk_text("short", MAX_TEXT_LENGTH), vec!["short"]);
    }
}
