#![allow(dead_code)]

/// Assembles replay buffers field by field for tests.
pub struct ReplayBuilder {
    pub mode: u8,
    pub game_version: u32,
    pub beatmap_hash: Option<String>,
    pub player_name: Option<String>,
    pub replay_hash: Option<String>,
    pub counts: [u16; 6],
    pub score: u32,
    pub max_combo: u16,
    pub full_combo: u8,
    pub mods: u32,
    pub life_bar: Option<String>,
    pub timestamp: u64,
    pub replay_data: Vec<u8>,
    pub online_score_id: u64,
}

impl Default for ReplayBuilder {
    fn default() -> Self {
        Self {
            mode: 0,
            game_version: 20210930,
            beatmap_hash: Some("a5b99395a42bd55bc5eb1d2411cbdf8b".to_string()),
            player_name: Some("peppy".to_string()),
            replay_hash: Some("0123456789abcdef0123456789abcdef".to_string()),
            counts: [250, 12, 3, 40, 8, 2],
            score: 4_200_000,
            max_combo: 512,
            full_combo: 0,
            mods: 8 | 64,
            life_bar: Some("0|1,1500|0.98,".to_string()),
            timestamp: 637_355_968_000_000_000,
            replay_data: vec![0x5d, 0x00, 0x00, 0x20, 0x00, 0xff, 0xff],
            online_score_id: 3_141_592_653,
        }
    }
}

impl ReplayBuilder {
    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.push(self.mode);
        out.extend_from_slice(&self.game_version.to_le_bytes());
        push_string(&mut out, self.beatmap_hash.as_deref());
        push_string(&mut out, self.player_name.as_deref());
        push_string(&mut out, self.replay_hash.as_deref());
        for count in self.counts {
            out.extend_from_slice(&count.to_le_bytes());
        }
        out.extend_from_slice(&self.score.to_le_bytes());
        out.extend_from_slice(&self.max_combo.to_le_bytes());
        out.push(self.full_combo);
        out.extend_from_slice(&self.mods.to_le_bytes());
        push_string(&mut out, self.life_bar.as_deref());
        out.extend_from_slice(&self.timestamp.to_le_bytes());
        out.extend_from_slice(&(self.replay_data.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.replay_data);
        out.extend_from_slice(&self.online_score_id.to_le_bytes());
        out
    }
}

pub fn push_uleb128(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

fn push_string(out: &mut Vec<u8>, value: Option<&str>) {
    match value {
        None => out.push(0x00),
        Some(text) => {
            out.push(0x0b);
            push_uleb128(out, text.len() as u64);
            out.extend_from_slice(text.as_bytes());
        }
    }
}
