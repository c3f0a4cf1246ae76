//! Contextual Arabic reshaping.
//!
//! Each letter is replaced by its isolated, final, initial or medial
//! presentation form depending on whether its neighbours connect to it.
//! Fonts that only map the base letters still render the presentation forms
//! through their cmap, so the output does not need a shaping engine.
//! Letters without a table entry pass through unchanged.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Joining {
    /// Connects only to the preceding letter (alef, dal, reh, waw...).
    Right,
    /// Connects on both sides.
    Dual,
    /// Forces joining on both sides (tatweel, ZWJ).
    Causing,
    /// Ignored when looking for neighbours (harakat).
    Transparent,
    None,
}

// (base, isolated, final, initial, medial); 0 = no such form.
#[rustfmt::skip]
const FORMS: &[(u32, u32, u32, u32, u32)] = &[
    (0x0621, 0xFE80, 0,      0,      0     ), // hamza
    (0x0622, 0xFE81, 0xFE82, 0,      0     ), // alef madda
    (0x0623, 0xFE83, 0xFE84, 0,      0     ), // alef hamza above
    (0x0624, 0xFE85, 0xFE86, 0,      0     ), // waw hamza
    (0x0625, 0xFE87, 0xFE88, 0,      0     ), // alef hamza below
    (0x0626, 0xFE89, 0xFE8A, 0xFE8B, 0xFE8C), // yeh hamza
    (0x0627, 0xFE8D, 0xFE8E, 0,      0     ), // alef
    (0x0628, 0xFE8F, 0xFE90, 0xFE91, 0xFE92), // beh
    (0x0629, 0xFE93, 0xFE94, 0,      0     ), // teh marbuta
    (0x062A, 0xFE95, 0xFE96, 0xFE97, 0xFE98), // teh
    (0x062B, 0xFE99, 0xFE9A, 0xFE9B, 0xFE9C), // theh
    (0x062C, 0xFE9D, 0xFE9E, 0xFE9F, 0xFEA0), // jeem
    (0x062D, 0xFEA1, 0xFEA2, 0xFEA3, 0xFEA4), // hah
    (0x062E, 0xFEA5, 0xFEA6, 0xFEA7, 0xFEA8), // khah
    (0x062F, 0xFEA9, 0xFEAA, 0,      0     ), // dal
    (0x0630, 0xFEAB, 0xFEAC, 0,      0     ), // thal
    (0x0631, 0xFEAD, 0xFEAE, 0,      0     ), // reh
    (0x0632, 0xFEAF, 0xFEB0, 0,      0     ), // zain
    (0x0633, 0xFEB1, 0xFEB2, 0xFEB3, 0xFEB4), // seen
    (0x0634, 0xFEB5, 0xFEB6, 0xFEB7, 0xFEB8), // sheen
    (0x0635, 0xFEB9, 0xFEBA, 0xFEBB, 0xFEBC), // sad
    (0x0636, 0xFEBD, 0xFEBE, 0xFEBF, 0xFEC0), // dad
    (0x0637, 0xFEC1, 0xFEC2, 0xFEC3, 0xFEC4), // tah
    (0x0638, 0xFEC5, 0xFEC6, 0xFEC7, 0xFEC8), // zah
    (0x0639, 0xFEC9, 0xFECA, 0xFECB, 0xFECC), // ain
    (0x063A, 0xFECD, 0xFECE, 0xFECF, 0xFED0), // ghain
    (0x0641, 0xFED1, 0xFED2, 0xFED3, 0xFED4), // feh
    (0x0642, 0xFED5, 0xFED6, 0xFED7, 0xFED8), // qaf
    (0x0643, 0xFED9, 0xFEDA, 0xFEDB, 0xFEDC), // kaf
    (0x0644, 0xFEDD, 0xFEDE, 0xFEDF, 0xFEE0), // lam
    (0x0645, 0xFEE1, 0xFEE2, 0xFEE3, 0xFEE4), // meem
    (0x0646, 0xFEE5, 0xFEE6, 0xFEE7, 0xFEE8), // noon
    (0x0647, 0xFEE9, 0xFEEA, 0xFEEB, 0xFEEC), // heh
    (0x0648, 0xFEED, 0xFEEE, 0,      0     ), // waw
    (0x0649, 0xFEEF, 0xFEF0, 0,      0     ), // alef maksura
    (0x064A, 0xFEF1, 0xFEF2, 0xFEF3, 0xFEF4), // yeh
    (0x0671, 0xFB50, 0xFB51, 0,      0     ), // alef wasla
    (0x067E, 0xFB56, 0xFB57, 0xFB58, 0xFB59), // peh
    (0x0686, 0xFB7A, 0xFB7B, 0xFB7C, 0xFB7D), // tcheh
    (0x0698, 0xFB8A, 0xFB8B, 0,      0     ), // jeh
    (0x06A4, 0xFB6A, 0xFB6B, 0xFB6C, 0xFB6D), // veh
    (0x06A9, 0xFB8E, 0xFB8F, 0xFB90, 0xFB91), // keheh
    (0x06AF, 0xFB92, 0xFB93, 0xFB94, 0xFB95), // gaf
    (0x06CC, 0xFBFC, 0xFBFD, 0xFBFE, 0xFBFF), // farsi yeh
];

const LAM: char = '\u{0644}';

/// Lam followed by one of these alefs becomes a single ligature: (isolated, final).
const LAM_ALEF: &[(char, char, char)] = &[
    ('\u{0622}', '\u{FEF5}', '\u{FEF6}'),
    ('\u{0623}', '\u{FEF7}', '\u{FEF8}'),
    ('\u{0625}', '\u{FEF9}', '\u{FEFA}'),
    ('\u{0627}', '\u{FEFB}', '\u{FEFC}'),
];

#[derive(Clone, Copy)]
struct Forms {
    isolated: char,
    final_: Option<char>,
    initial: Option<char>,
    medial: Option<char>,
}

fn form_char(cp: u32) -> Option<char> {
    if cp == 0 { None } else { char::from_u32(cp) }
}

fn lookup(c: char) -> Option<Forms> {
    let idx = FORMS.binary_search_by_key(&(c as u32), |f| f.0).ok()?;
    let (_, iso, fin, ini, med) = FORMS[idx];
    Some(Forms {
        isolated: form_char(iso)?,
        final_: form_char(fin),
        initial: form_char(ini),
        medial: form_char(med),
    })
}

fn is_transparent(c: char) -> bool {
    matches!(c as u32,
        0x0610..=0x061A
        | 0x064B..=0x065F
        | 0x0670
        | 0x06D6..=0x06DC
        | 0x06DF..=0x06E4
        | 0x06E7..=0x06E8
        | 0x06EA..=0x06ED)
}

fn joining(c: char) -> Joining {
    if is_transparent(c) {
        return Joining::Transparent;
    }
    if c == '\u{0640}' || c == '\u{200D}' {
        return Joining::Causing;
    }
    match lookup(c) {
        Some(f) if f.initial.is_some() => Joining::Dual,
        Some(f) if f.final_.is_some() => Joining::Right,
        _ => Joining::None,
    }
}

fn prev_joining(chars: &[char], i: usize) -> Joining {
    chars[..i]
        .iter()
        .rev()
        .map(|&c| joining(c))
        .find(|j| *j != Joining::Transparent)
        .unwrap_or(Joining::None)
}

fn next_joining(chars: &[char], i: usize) -> Joining {
    chars[i + 1..]
        .iter()
        .map(|&c| joining(c))
        .find(|j| *j != Joining::Transparent)
        .unwrap_or(Joining::None)
}

fn connects_to_prev(chars: &[char], i: usize) -> bool {
    matches!(joining(chars[i]), Joining::Right | Joining::Dual | Joining::Causing)
        && matches!(prev_joining(chars, i), Joining::Dual | Joining::Causing)
}

fn connects_to_next(chars: &[char], i: usize) -> bool {
    matches!(joining(chars[i]), Joining::Dual | Joining::Causing)
        && matches!(
            next_joining(chars, i),
            Joining::Right | Joining::Dual | Joining::Causing
        )
}

/// For a lam at `i`, the index of a following alef (marks in between are
/// allowed) and the ligature forms it produces.
fn lam_alef_at(chars: &[char], i: usize) -> Option<(usize, char, char)> {
    if chars[i] != LAM {
        return None;
    }
    let j = (i + 1..chars.len()).find(|&k| !is_transparent(chars[k]))?;
    LAM_ALEF
        .iter()
        .find(|(alef, _, _)| *alef == chars[j])
        .map(|&(_, iso, fin)| (j, iso, fin))
}

/// Replace Arabic letters with their contextual presentation forms, in logical order.
pub fn reshape(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let Some(forms) = lookup(c) else {
            out.push(c);
            i += 1;
            continue;
        };
        let joins_prev = connects_to_prev(&chars, i);

        if let Some((alef_idx, iso, fin)) = lam_alef_at(&chars, i) {
            out.push(if joins_prev { fin } else { iso });
            // marks between lam and alef follow the ligature
            out.extend(&chars[i + 1..alef_idx]);
            i = alef_idx + 1;
            continue;
        }

        let joins_next = connects_to_next(&chars, i);
        let shaped = match (joins_prev, joins_next) {
            (true, true) => forms.medial,
            (true, false) => forms.final_,
            (false, true) => forms.initial,
            (false, false) => None,
        };
        out.push(shaped.unwrap_or(forms.isolated));
        i += 1;
    }
    out
}
