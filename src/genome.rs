// Genomes and their reduction to push code.
//
// A genome is a flat list of genes: expression templates plus OPEN
// and CLOSE markers. Linearization matches marker pairs into nested
// blocks, closes unmatched opens implicitly, and drops orphan closes,
// leaving a sequence the compiler can run directly.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::expr::Expr;
use crate::soup::Soup;


#[derive(Clone, Debug, PartialEq)]
pub enum Gene {
    Open,
    Close,
    Expr(Expr),
}


// One element of a push sequence. No markers survive linearization.
#[derive(Clone, Debug, PartialEq)]
pub enum Code {
    Expr(Expr),
    Block(Vec<Code>),
}


enum Work {
    Open,
    Code(Code),
}


pub fn linearize(genome: &[Gene]) -> Vec<Code> {
    let mut buffer: VecDeque<Gene> = genome.iter().cloned().collect();
    let mut out: Vec<Work> = Vec::new();
    loop {
        match buffer.pop_front() {
            None => {
                // Unmatched opens get closed implicitly. Each
                // synthesized close retires one marker, so this
                // terminates.
                if out.iter().any(|w| matches!(w, Work::Open)) {
                    buffer.push_back(Gene::Close);
                } else {
                    return out
                        .into_iter()
                        .map(|w| match w {
                            Work::Code(code) => code,
                            Work::Open => unreachable!("open markers all matched"),
                        })
                        .collect();
                }
            }
            Some(Gene::Open) => out.push(Work::Open),
            Some(Gene::Close) => {
                // Everything right of the rightmost open becomes a
                // nested block; a close with no open is dropped.
                if let Some(ndx) = out.iter().rposition(|w| matches!(w, Work::Open)) {
                    let nested: Vec<Code> = out
                        .drain(ndx + 1..)
                        .map(|w| match w {
                            Work::Code(code) => code,
                            Work::Open => unreachable!("rightmost open was further left"),
                        })
                        .collect();
                    out.pop();
                    out.push(Work::Code(Code::Block(nested)));
                }
            }
            Some(Gene::Expr(e)) => out.push(Work::Code(Code::Expr(e))),
        }
    }
}


// Draws random genomes out of a soup. Seedable for reproducibility.
pub struct Spawner<'a> {
    soup: &'a Soup,
    rng: StdRng,
}


impl<'a> Spawner<'a> {
    pub fn new(soup: &'a Soup) -> Spawner<'a> {
        Spawner { soup, rng: StdRng::from_entropy() }
    }

    pub fn with_seed(soup: &'a Soup, seed: u64) -> Spawner<'a> {
        Spawner { soup, rng: StdRng::seed_from_u64(seed) }
    }

    pub fn spawn_gene(&mut self) -> Gene {
        self.soup.random_unit(&mut self.rng)
    }

    pub fn spawn_genome_of_size(&mut self, size: usize) -> Vec<Gene> {
        (0..size).map(|_| self.spawn_gene()).collect()
    }

    pub fn spawn_genome(&mut self, min_size: usize, max_size: usize) -> Vec<Gene> {
        let size = self.rng.gen_range(min_size..=max_size);
        self.spawn_genome_of_size(size)
    }

    pub fn spawn_code_of_size(&mut self, size: usize) -> Vec<Code> {
        linearize(&self.spawn_genome_of_size(size))
    }

    pub fn spawn_code(&mut self, min_size: usize, max_size: usize) -> Vec<Code> {
        linearize(&self.spawn_genome(min_size, max_size))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn c(v: i64) -> Gene {
        Gene::Expr(Expr::constant(Value::Int(v)))
    }

    fn ce(v: i64) -> Code {
        Code::Expr(Expr::constant(Value::Int(v)))
    }

    #[test]
    fn test_no_markers_passes_through() {
        let genome = vec![c(1), c(2), c(3)];
        assert_eq!(linearize(&genome), vec![ce(1), ce(2), ce(3)]);
    }

    #[test]
    fn test_matched_pair_nests() {
        let genome = vec![c(1), Gene::Open, c(2), c(3), Gene::Close, c(4)];
        assert_eq!(
            linearize(&genome),
            vec![ce(1), Code::Block(vec![ce(2), ce(3)]), ce(4)]
        );
    }

    #[test]
    fn test_nested_pairs() {
        let genome = vec![
            Gene::Open,
            c(1),
            Gene::Open,
            c(2),
            Gene::Close,
            Gene::Close,
        ];
        assert_eq!(
            linearize(&genome),
            vec![Code::Block(vec![ce(1), Code::Block(vec![ce(2)])])]
        );
    }

    #[test]
    fn test_orphan_close_is_dropped() {
        let genome = vec![Gene::Close, c(1), Gene::Close, c(2)];
        assert_eq!(linearize(&genome), vec![ce(1), ce(2)]);
    }

    #[test]
    fn test_orphan_open_closes_implicitly() {
        let genome = vec![c(1), Gene::Open, c(2)];
        assert_eq!(
            linearize(&genome),
            vec![ce(1), Code::Block(vec![ce(2)])]
        );

        let genome = vec![Gene::Open, c(1), Gene::Open, c(2)];
        assert_eq!(
            linearize(&genome),
            vec![Code::Block(vec![ce(1), Code::Block(vec![ce(2)])])]
        );
    }

    #[test]
    fn test_empty_genome() {
        let genome: Vec<Gene> = vec![];
        assert_eq!(linearize(&genome), vec![]);
    }

    #[test]
    fn test_idempotent_on_marker_free_input() {
        let genome = vec![c(1), Gene::Open, c(2), Gene::Close];
        let once = linearize(&genome);
        // Re-feeding the expression genes of an already-linearized
        // sequence changes nothing.
        let as_genes: Vec<Gene> = once
            .iter()
            .filter_map(|code| match code {
                Code::Expr(e) => Some(Gene::Expr(e.clone())),
                Code::Block(_) => None,
            })
            .collect();
        let flat: Vec<Code> = once
            .iter()
            .filter(|code| matches!(code, Code::Expr(_)))
            .cloned()
            .collect();
        assert_eq!(linearize(&as_genes), flat);
    }

    #[test]
    fn test_spawner_is_reproducible() {
        let soup = Soup::core();
        let mut a = Spawner::with_seed(&soup, 17);
        let mut b = Spawner::with_seed(&soup, 17);
        assert_eq!(a.spawn_genome_of_size(50), b.spawn_genome_of_size(50));

        let mut c = Spawner::with_seed(&soup, 18);
        // Genomes from different seeds almost surely differ.
        assert_ne!(
            Spawner::with_seed(&soup, 17).spawn_genome_of_size(50),
            c.spawn_genome_of_size(50)
        );
    }

    #[test]
    fn test_spawn_genome_size_bounds() {
        let soup = Soup::core();
        let mut spawner = Spawner::with_seed(&soup, 3);
        for _ in 0..20 {
            let genome = spawner.spawn_genome(5, 10);
            assert!(genome.len() >= 5 && genome.len() <= 10);
        }
    }

    #[test]
    fn test_spawn_code_has_no_markers() {
        let soup = Soup::core();
        let mut spawner = Spawner::with_seed(&soup, 11);
        let code = spawner.spawn_code_of_size(100);
        fn no_markers(code: &[Code]) {
            for el in code {
                if let Code::Block(items) = el {
                    no_markers(items);
                }
            }
        }
        no_markers(&code);
        assert!(code.len() <= 100);
    }
}
