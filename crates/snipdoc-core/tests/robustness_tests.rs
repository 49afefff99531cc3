//! Mutation-based robustness tests for the round-trip pipeline.
//!
//! Each sample fragment is damaged with a few seeded random mutations, then
//! pushed through load/serialize. Whatever the damage, three properties must
//! hold: the pipeline never fails, the wrapper never leaks into the output,
//! and the normalized output is a fixed point of a second round trip.

use snipdoc_core::{roundtrip, SnippetDocument, CONTENT_ID};

const SEED: u64 = 0x5eed;
const VARIANT_COUNT: usize = 8;
const MAX_MUTATION_STEPS: usize = 3;
const MAX_VARIANT_LEN: usize = 32_000;

// Samples deliberately avoid <pre> and <textarea>: the parser eats a
// newline directly after those open tags, so a fragment that embeds one is
// not always a one-pass fixed point. That is a property of HTML itself, not
// of the wrapper.
const SAMPLES: &[(&str, &str)] = &[
    ("paragraphs", "<p>alpha</p><p>beta</p>"),
    ("nested_list", "<div><ul><li>one<li>two</ul></div>"),
    ("misnested_formatting", "<b><i>styled</b></i> tail"),
    ("table", "<table><tr><td>cell</td></tr></table>"),
    ("attributes_and_entities", "<p class=\"intro\">text &amp; more</p>"),
    ("plain_text", "plain text with no markup at all"),
    (
        "quote_with_comment",
        "<blockquote><p>quoted</p></blockquote><!-- trailing note -->",
    ),
];

const MUTATIONS: &[&str] = &[
    "drop_close_tag",
    "drop_quote",
    "drop_angle",
    "insert_stray_close",
    "duplicate_open_tag",
    "unterminate_comment",
    "truncate_tail",
    "double_content",
];

struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    fn choose(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        (self.next_u32() as usize) % max
    }
}

fn apply_mutations(mut input: String, rng: &mut Lcg) -> String {
    for _ in 0..MAX_MUTATION_STEPS {
        let pick = rng.choose(MUTATIONS.len());
        match MUTATIONS[pick] {
            "drop_close_tag" => {
                if let Some(pos) = input.rfind("</") {
                    if let Some(end) = input[pos..].find('>') {
                        input.replace_range(pos..pos + end + 1, "");
                    }
                }
            }
            "drop_quote" => {
                if let Some(pos) = input.find('"') {
                    input.remove(pos);
                }
            }
            "drop_angle" => {
                if let Some(pos) = input.find('>') {
                    input.remove(pos);
                }
            }
            "insert_stray_close" => {
                if let Some(pos) = input.find('>') {
                    input.insert_str(pos + 1, "</div>");
                } else {
                    input.insert_str(0, "</div>");
                }
            }
            "duplicate_open_tag" => {
                if let Some(pos) = find_open_tag(&input) {
                    if let Some(end) = input[pos..].find('>') {
                        let tag = input[pos..pos + end + 1].to_string();
                        input.insert_str(pos, &tag);
                    }
                }
            }
            "unterminate_comment" => {
                if let Some(pos) = input.find("-->") {
                    input.replace_range(pos..pos + 3, "");
                }
            }
            "truncate_tail" => {
                let len = input.len();
                if len > 8 {
                    let mut cut = len - rng.choose(len / 4).max(1);
                    while !input.is_char_boundary(cut) {
                        cut -= 1;
                    }
                    input.truncate(cut);
                }
            }
            "double_content" => {
                let copy = input.clone();
                input.push_str(&copy);
            }
            _ => {}
        }
        if input.len() > MAX_VARIANT_LEN {
            let mut cut = MAX_VARIANT_LEN;
            while !input.is_char_boundary(cut) {
                cut -= 1;
            }
            input.truncate(cut);
            break;
        }
    }
    input
}

fn find_open_tag(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    for (pos, &byte) in bytes.iter().enumerate() {
        if byte == b'<' && bytes.get(pos + 1).is_some_and(|next| next.is_ascii_alphabetic()) {
            return Some(pos);
        }
    }
    None
}

fn generate_variants(input: &str, seed: u64) -> Vec<String> {
    let mut rng = Lcg::new(seed);
    let mut variants = Vec::new();
    for _ in 0..VARIANT_COUNT {
        variants.push(apply_mutations(input.to_string(), &mut rng));
    }
    variants
}

#[test]
fn robustness_mutated_fragments_never_fail() {
    for (name, sample) in SAMPLES {
        for (index, variant) in generate_variants(sample, SEED).iter().enumerate() {
            let output = roundtrip(variant).unwrap_or_else(|err| {
                panic!(
                    "{} variant {} failed: {} (input {:?})",
                    name, index, err, variant
                )
            });
            assert!(
                !output.contains(CONTENT_ID),
                "{} variant {} leaked the wrapper: {:?}",
                name,
                index,
                output
            );
        }
    }
}

#[test]
fn robustness_normal_form_is_a_fixed_point() {
    for (name, sample) in SAMPLES {
        for (index, variant) in generate_variants(sample, SEED).iter().enumerate() {
            let once = roundtrip(variant).unwrap();
            let twice = roundtrip(&once).unwrap();
            assert_eq!(
                once, twice,
                "{} variant {} is not a fixed point (input {:?})",
                name, index, variant
            );
        }
    }
}

#[test]
fn robustness_report() {
    println!("\nRobustness Report");
    println!("Seed\t0x{:x}", SEED);
    println!("sample\tvariants\trepaired\tavg_diagnostics\tmax_output_len");

    for (name, sample) in SAMPLES {
        let variants = generate_variants(sample, SEED);
        let mut repaired = 0u32;
        let mut diagnostics = 0usize;
        let mut max_output_len = 0usize;

        for variant in &variants {
            let mut doc = SnippetDocument::new();
            doc.load(variant);
            let errors = doc.parse_errors();
            if !errors.is_empty() {
                repaired += 1;
            }
            diagnostics += errors.len();
            let output = doc.serialize().unwrap();
            max_output_len = max_output_len.max(output.len());
        }

        println!(
            "{}\t{}\t{}\t{:.2}\t{}",
            name,
            variants.len(),
            repaired,
            diagnostics as f64 / variants.len() as f64,
            max_output_len
        );
    }
    println!();
}
