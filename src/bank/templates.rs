//! Offline template generator for fraction items
//!
//! Fills every (format, difficulty) cell with freshly generated exercises so a
//! bank with full coverage can be produced without any external service.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::bank::fraction::{lcm, Fraction};
use crate::bank::item::{Item, ItemRecord, DEFAULT_TOPIC, MCQ_OPTIONS, NO_CORRECT_INDEX};
use crate::core::error::SchemaError;
use crate::core::types::{Cell, Format};

/// Answers used to pad multiple-choice distractors
const FALLBACK_OPTIONS: [&str; 6] = ["0/1", "1/2", "2/1", "3/2", "2/3", "3/4"];

/// Perturbations of the correct answer that make plausible wrong options
const PERTURBATIONS: [(i64, i64); 6] = [(1, 0), (-1, 0), (0, 1), (0, -1), (1, 1), (-1, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl Op {
    fn symbol(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "−",
            Op::Mul => "×",
            Op::Div => "÷",
        }
    }

    fn skill(self) -> &'static str {
        match self {
            Op::Add => "soma de frações",
            Op::Sub => "subtração de frações",
            Op::Mul => "multiplicação de frações",
            Op::Div => "divisão de frações",
        }
    }
}

struct OpExample {
    a: Fraction,
    b: Fraction,
    op: Op,
    result: Fraction,
}

/// Generated content for one item, before ids and metadata are attached
struct Payload {
    statement: String,
    solution: String,
    options: Vec<String>,
    correct_index: i32,
    skills: Vec<String>,
    tags: Vec<String>,
}

/// Generate `items_per_cell` items for every cell, deterministically from `seed`
pub fn generate_bank(items_per_cell: u32, seed: u64) -> Result<Vec<Item>, SchemaError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut items = Vec::with_capacity(Cell::all().count() * items_per_cell as usize);

    for cell in Cell::all() {
        for variation in 1..=items_per_cell {
            items.push(generate_item(&mut rng, cell, variation, seed)?);
        }
    }

    tracing::debug!("Generated {} template items (seed {})", items.len(), seed);
    Ok(items)
}

/// Generate a single item for a cell
pub fn generate_item<R: Rng + ?Sized>(
    rng: &mut R,
    cell: Cell,
    variation: u32,
    seed: u64,
) -> Result<Item, SchemaError> {
    let d = cell.difficulty.get();
    let payload = match cell.format {
        Format::ShortText => short_text(rng, d),
        Format::MultipleChoice => multiple_choice(rng, d),
        Format::Visual => visual(rng, d),
        Format::Scaffold => scaffold(rng, d),
    };

    Item::new(ItemRecord {
        id: format!("{}_{}_d{}_t{}_v{}", DEFAULT_TOPIC, cell.format, d, seed, variation),
        topic: DEFAULT_TOPIC.to_string(),
        format: cell.format,
        difficulty: d,
        variation,
        statement: payload.statement,
        options: payload.options,
        correct_index: payload.correct_index,
        solution: payload.solution,
        skills: payload.skills,
        tags: payload.tags,
        reading_load: Some(cell.format.reading_load()),
    })
}

/// Denominator pool grows with difficulty
fn choose_denominators<R: Rng + ?Sized>(rng: &mut R, difficulty: u8) -> (i64, i64) {
    let pool: &[i64] = match difficulty {
        0..=2 => &[2, 3, 4, 5, 6, 7, 8, 9, 10],
        3 => &[4, 5, 6, 7, 8, 9, 10, 12, 14, 15],
        _ => &[6, 7, 8, 9, 10, 12, 14, 15, 16, 18, 20],
    };
    (pick(rng, pool), pick(rng, pool))
}

fn pick<R: Rng + ?Sized, T: Copy>(rng: &mut R, pool: &[T]) -> T {
    pool[rng.gen_range(0..pool.len())]
}

/// Proper fraction with the given denominator
fn proper_fraction<R: Rng + ?Sized>(rng: &mut R, den: i64) -> Fraction {
    Fraction::reduced(rng.gen_range(1..den), den)
}

fn op_example<R: Rng + ?Sized>(rng: &mut R, difficulty: u8) -> OpExample {
    let ops: &[Op] = if difficulty <= 2 {
        &[Op::Add, Op::Sub]
    } else {
        &[Op::Add, Op::Sub, Op::Mul, Op::Div]
    };
    let op = pick(rng, ops);
    let (da, db) = choose_denominators(rng, difficulty);
    let a = proper_fraction(rng, da);
    let b = proper_fraction(rng, db);

    // b is a proper fraction, so it is never zero
    let result = match op {
        Op::Add => a + b,
        Op::Sub => a - b,
        Op::Mul => a * b,
        Op::Div => a.checked_div(b).unwrap_or(a),
    };
    OpExample { a, b, op, result }
}

fn short_text_from(ex: &OpExample) -> Payload {
    let answer = ex.result.to_string();
    Payload {
        statement: format!("Calcule: {} {} {}.", ex.a, ex.op.symbol(), ex.b),
        solution: format!("Resposta: {}. (Simplifique a fração se necessário.)", answer),
        options: Vec::new(),
        correct_index: NO_CORRECT_INDEX,
        skills: vec![ex.op.skill().to_string()],
        tags: vec![DEFAULT_TOPIC.to_string(), "template".to_string()],
    }
}

fn short_text<R: Rng + ?Sized>(rng: &mut R, difficulty: u8) -> Payload {
    short_text_from(&op_example(rng, difficulty))
}

fn multiple_choice<R: Rng + ?Sized>(rng: &mut R, difficulty: u8) -> Payload {
    let ex = op_example(rng, difficulty);
    let mut payload = short_text_from(&ex);
    let correct = ex.result;
    let answer = correct.to_string();

    let mut distractors: BTreeSet<String> = BTreeSet::new();
    let mut add_candidate = |candidate: Option<Fraction>| {
        if let Some(f) = candidate {
            if f != correct && !f.is_negative() {
                distractors.insert(f.to_string());
            }
        }
    };

    // Classic classroom mistakes
    let (a, b) = (ex.a, ex.b);
    match ex.op {
        Op::Add | Op::Sub => {
            let signed_b = if ex.op == Op::Add { b.numer() } else { -b.numer() };
            add_candidate(Fraction::new(a.numer() + signed_b, a.denom() + b.denom()));
            add_candidate(Fraction::new(a.numer() + signed_b, a.denom()));
        }
        Op::Mul => add_candidate(Fraction::new(a.numer() * b.numer(), a.denom())),
        Op::Div => add_candidate(Some(a * b)),
    }

    for (dn, dd) in PERTURBATIONS {
        add_candidate(Fraction::new(correct.numer() + dn, correct.denom() + dd));
    }

    let mut tries = 0;
    while distractors.len() < MCQ_OPTIONS - 1 && tries < 200 {
        tries += 1;
        let den = (correct.denom() + pick(rng, &[-2, -1, 1, 2, 3])).max(1);
        let num = (correct.numer() + pick(rng, &[-3, -2, -1, 1, 2, 3])).max(0);
        if let Some(f) = Fraction::new(num, den) {
            if f != correct {
                distractors.insert(f.to_string());
            }
        }
    }

    for fallback in FALLBACK_OPTIONS {
        if distractors.len() >= MCQ_OPTIONS - 1 {
            break;
        }
        if fallback != answer {
            distractors.insert(fallback.to_string());
        }
    }

    let mut options: Vec<String> = distractors.into_iter().take(MCQ_OPTIONS - 1).collect();
    options.push(answer.clone());
    options.shuffle(rng);
    let correct_index = options.iter().position(|o| *o == answer).unwrap_or(0) as i32;

    payload.statement = payload
        .statement
        .replace("Calcule:", "Escolha a alternativa correta para:")
        + " (resposta em forma de fração)";
    payload.options = options;
    payload.correct_index = correct_index;
    payload.skills.push("múltipla escolha".to_string());
    payload
}

fn visual<R: Rng + ?Sized>(rng: &mut R, difficulty: u8) -> Payload {
    let tags = vec![
        DEFAULT_TOPIC.to_string(),
        "visual".to_string(),
        "template".to_string(),
    ];

    if difficulty <= 2 {
        let parts = pick(rng, &[4, 6, 8, 10]);
        let shaded = rng.gen_range(1..parts);
        let simplified = Fraction::reduced(shaded, parts);
        return Payload {
            statement: format!(
                "Imagine uma barra dividida em {} partes iguais. {} partes estão pintadas. \
                 Qual fração da barra está pintada?",
                parts, shaded
            ),
            solution: format!(
                "A fração é {}/{}, que pode ser simplificada para {}.",
                shaded, parts, simplified
            ),
            options: Vec::new(),
            correct_index: NO_CORRECT_INDEX,
            skills: vec![
                "representação visual".to_string(),
                "fração parte-todo".to_string(),
                "simplificação".to_string(),
            ],
            tags,
        };
    }

    let n1 = pick(rng, &[6, 8, 10, 12]);
    let n2 = pick(rng, &[6, 8, 10, 12]);
    let s1 = rng.gen_range(1..n1);
    let s2 = rng.gen_range(1..n2);
    let f1 = Fraction::reduced(s1, n1);
    let f2 = Fraction::reduced(s2, n2);
    let relation = match f1.cmp(&f2) {
        std::cmp::Ordering::Greater => "maior",
        std::cmp::Ordering::Less => "menor",
        std::cmp::Ordering::Equal => "igual",
    };
    Payload {
        statement: format!(
            "Considere duas barras: a primeira tem {} de {} partes pintadas, e a segunda tem \
             {} de {} partes pintadas. A primeira fração pintada é maior, menor ou igual \
             à segunda?",
            s1, n1, s2, n2
        ),
        solution: format!(
            "Comparando {} e {}, a primeira é {} que a segunda.",
            f1, f2, relation
        ),
        options: Vec::new(),
        correct_index: NO_CORRECT_INDEX,
        skills: vec![
            "comparação de frações".to_string(),
            "representação visual".to_string(),
        ],
        tags,
    }
}

fn scaffold<R: Rng + ?Sized>(rng: &mut R, difficulty: u8) -> Payload {
    let (da, db) = choose_denominators(rng, difficulty.max(2));
    let a = proper_fraction(rng, da);
    let b = proper_fraction(rng, db);
    let common = lcm(da, db);

    // Numerators over the common denominator, before simplification
    let a_num = a.numer() * (common / a.denom());
    let b_num = b.numer() * (common / b.denom());
    let sum = a + b;

    Payload {
        statement: format!(
            "Resolva passo a passo (preencha mentalmente as lacunas):\n\
             1) Encontre o MMC de {da} e {db}: MMC = ___.\n\
             2) Reescreva {a} e {b} com denominador {common}.\n   \
             {a} = ___/{common} e {b} = ___/{common}.\n\
             3) Some os numeradores: ___ + ___ = ___.\n\
             4) Resultado: ___/{common}. Simplifique se possível."
        ),
        solution: format!(
            "MMC({da},{db}) = {common}. {a} = {a_num}/{common}, {b} = {b_num}/{common}. \
             Soma: {a_num}+{b_num}={total}. Resultado: {total}/{common} (simplificado: {sum}).",
            total = a_num + b_num,
        ),
        options: Vec::new(),
        correct_index: NO_CORRECT_INDEX,
        skills: vec![
            "MMC".to_string(),
            "equivalência de frações".to_string(),
            "soma de frações".to_string(),
            "scaffold".to_string(),
        ],
        tags: vec![
            DEFAULT_TOPIC.to_string(),
            "scaffold".to_string(),
            "template".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::QuestionBank;

    #[test]
    fn test_generated_bank_covers_every_cell() {
        let items = generate_bank(3, 0).unwrap();
        assert_eq!(items.len(), 60);
        let bank = QuestionBank::from_items(items);
        assert!(bank.missing_cells().is_empty());
        for cell in Cell::all() {
            assert_eq!(bank.cell_len(cell), 3);
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(generate_bank(2, 7).unwrap(), generate_bank(2, 7).unwrap());
    }

    #[test]
    fn test_mcq_items_have_four_distinct_options() {
        let items = generate_bank(20, 11).unwrap();
        for item in items.iter().filter(|i| i.format() == Format::MultipleChoice) {
            let unique: BTreeSet<&String> = item.options().iter().collect();
            assert_eq!(unique.len(), MCQ_OPTIONS, "item {}", item.id());
            assert!(item.correct_index().is_some());
        }
    }

    #[test]
    fn test_item_ids_and_loads() {
        let items = generate_bank(1, 4).unwrap();
        let first = &items[0];
        assert_eq!(first.id(), "frações_short_text_d1_t4_v1");
        for item in &items {
            assert_eq!(item.reading_load(), item.format().reading_load());
            assert!(item.tags().iter().any(|t| t == "template"));
        }
    }

    #[test]
    fn test_easy_cells_use_add_or_sub_only() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..50 {
            let ex = op_example(&mut rng, 1);
            assert!(matches!(ex.op, Op::Add | Op::Sub));
        }
    }
}
