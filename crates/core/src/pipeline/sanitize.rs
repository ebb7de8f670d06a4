use crate::table::Frame;

/// Mis-encoded byte sequences (Latin-1/UTF-8 mojibake artifacts) stripped
/// from every text cell of the final export. This is a fixed denylist
/// substring removal, not encoding repair: the acceptance criterion is that
/// these sequences never appear in the output.
pub const MOJIBAKE_SEQUENCES: [&str; 5] = ["\u{201a}", "\u{192}", "\u{c3}", "\u{c2}", "\u{c3}\u{c2}"];

pub fn sanitize_frame(frame: &mut Frame) {
    for cell in frame.cells_mut() {
        if MOJIBAKE_SEQUENCES.iter().any(|sequence| cell.contains(sequence)) {
            let mut cleaned = cell.clone();
            for sequence in MOJIBAKE_SEQUENCES {
                cleaned = cleaned.replace(sequence, "");
            }
            *cell = cleaned;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::table::Frame;

    use super::{sanitize_frame, MOJIBAKE_SEQUENCES};

    fn single_cell(value: &str) -> Frame {
        Frame::new(vec!["Body (HTML)".to_string()], vec![vec![value.to_string()]])
    }

    #[test]
    fn strips_every_denylisted_sequence() {
        let mut frame = single_cell("fine\u{c3}\u{c2}print\u{201a} and \u{192}loss");
        sanitize_frame(&mut frame);

        assert_eq!(frame.cell(0, 0), "fineprint and loss");
        for sequence in MOJIBAKE_SEQUENCES {
            assert!(!frame.cell(0, 0).contains(sequence));
        }
    }

    #[test]
    fn leaves_clean_text_and_empty_cells_untouched() {
        let mut frame = Frame::new(
            vec!["A".to_string(), "B".to_string()],
            vec![vec!["caf\u{e9} & 10.00".to_string(), String::new()]],
        );
        sanitize_frame(&mut frame);

        assert_eq!(frame.cell(0, 0), "caf\u{e9} & 10.00");
        assert_eq!(frame.cell(0, 1), "");
    }
}
