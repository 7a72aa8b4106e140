use super::error::ReplayError;
use super::layout;
use super::mods::Mods;
use super::reader::ReplayReader;
use crate::diagnostics::Diagnostic;
use crate::{GameMode, HitCounts, ReplayRecord};

/// A fully decoded replay plus the non-fatal diagnostics raised on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedReplay {
    pub record: ReplayRecord,
    pub diagnostics: Vec<Diagnostic>,
}

/// Decode a complete replay buffer.
///
/// Non-standard modes are decoded with the shared layout and flagged with
/// [`Diagnostic::UnsupportedMode`]. Bytes left after the last field are
/// reported as [`Diagnostic::TrailingBytes`].
pub fn decode_replay(data: &[u8]) -> Result<DecodedReplay, ReplayError> {
    let mut reader = ReplayReader::new(data);
    let mut diagnostics = Vec::new();

    let mode = GameMode::from(reader.read_u8()?);
    if !mode.is_standard() {
        diagnostics.push(Diagnostic::UnsupportedMode { mode: mode.id() });
    }
    let game_version = reader.read_u32()?;

    let beatmap_hash = reader.read_optional_string()?;
    let player_name = reader.read_optional_string()?;
    let replay_hash = reader.read_optional_string()?;

    let counts = read_hit_counts(&mut reader)?;

    let score = reader.read_u32()?;
    let max_combo = reader.read_u16()?;
    let full_combo = reader.read_bool()?;
    let mods = Mods::from_bits(reader.read_u32()?);

    let life_bar = reader.read_optional_string()?;
    let timestamp = reader.read_u64()?;

    let replay_len = reader.read_u32()?;
    let replay_data = reader.read_raw(replay_len as usize)?.to_vec();

    let online_score_id = reader.read_u64()?;

    let leftover = reader.remaining();
    if leftover > 0 {
        diagnostics.push(Diagnostic::TrailingBytes { count: leftover });
    }

    Ok(DecodedReplay {
        record: ReplayRecord {
            mode,
            game_version,
            beatmap_hash,
            player_name,
            replay_hash,
            counts,
            score,
            max_combo,
            full_combo,
            mods,
            life_bar,
            timestamp,
            replay_data,
            online_score_id,
        },
        diagnostics,
    })
}

fn read_hit_counts(reader: &mut ReplayReader<'_>) -> Result<HitCounts, ReplayError> {
    reader.require_len(6 * layout::SHORT_WIDTH)?;
    Ok(HitCounts {
        count_300: reader.read_u16()?,
        count_100: reader.read_u16()?,
        count_50: reader.read_u16()?,
        count_geki: reader.read_u16()?,
        count_katu: reader.read_u16()?,
        count_miss: reader.read_u16()?,
    })
}

#[cfg(test)]
mod tests {
    use super::decode_replay;
    use crate::GameMode;
    use crate::diagnostics::Diagnostic;
    use crate::format::error::ReplayError;
    use crate::format::layout;

    fn minimal(mode: u8) -> Vec<u8> {
        let mut data = vec![0u8; layout::MIN_LEN];
        data[0] = mode;
        data
    }

    #[test]
    fn decode_minimal_replay() {
        let data = minimal(layout::MODE_STANDARD);
        let decoded = decode_replay(&data).unwrap();
        assert!(decoded.diagnostics.is_empty());
        assert_eq!(decoded.record.mode, GameMode::Standard);
        assert_eq!(decoded.record.beatmap_hash, None);
        assert!(decoded.record.replay_data.is_empty());
    }

    #[test]
    fn decode_flags_other_modes() {
        let data = minimal(layout::MODE_MANIA);
        let decoded = decode_replay(&data).unwrap();
        assert_eq!(decoded.record.mode, GameMode::Mania);
        assert_eq!(
            decoded.diagnostics,
            vec![Diagnostic::UnsupportedMode { mode: layout::MODE_MANIA }]
        );
    }

    #[test]
    fn decode_reports_trailing_bytes() {
        let mut data = minimal(layout::MODE_STANDARD);
        data.extend_from_slice(&[0xde, 0xad]);
        let decoded = decode_replay(&data).unwrap();
        assert_eq!(decoded.diagnostics, vec![Diagnostic::TrailingBytes { count: 2 }]);
    }

    #[test]
    fn decode_truncated_fails() {
        let data = minimal(layout::MODE_STANDARD);
        for len in 0..data.len() {
            let err = decode_replay(&data[..len]).unwrap_err();
            assert!(
                matches!(err, ReplayError::OutOfBounds { .. }),
                "len {len}: {err}"
            );
        }
    }

    #[test]
    fn decode_rejects_bad_marker() {
        let mut data = minimal(layout::MODE_STANDARD);
        data[5] = 0x01;
        let err = decode_replay(&data).unwrap_err();
        assert_eq!(err, ReplayError::MalformedMarker { offset: 5, value: 0x01 });
    }
}
