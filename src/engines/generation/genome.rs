/// Genome representation for the string evolver
///
/// A genome is a fixed-length sequence of character codes (Unicode scalar values).
/// Working on integer codes instead of `String` keeps every operator independent of
/// text encoding: crossover copies positions, mutation redraws codes, and the error
/// metric is plain integer arithmetic.
///
/// # Example
///
/// ```
/// use stringevo::engines::generation::genome::{encode_solution, genome_to_string};
///
/// let genome = encode_solution("AB");
/// assert_eq!(genome, vec![65, 66]);
/// assert_eq!(genome_to_string(&genome), "AB");
/// ```
pub type Genome = Vec<u32>;

/// Encode a target string as a genome, one code per `char`.
pub fn encode_solution(solution: &str) -> Genome {
    solution.chars().map(|c| c as u32).collect()
}

/// Render a genome for progress output.
///
/// Control characters and codes that are not valid scalar values are escaped so that
/// a rendered genome never breaks a console line.
pub fn genome_to_string(genome: &[u32]) -> String {
    let mut out = String::with_capacity(genome.len());
    for &code in genome {
        match char::from_u32(code) {
            Some(c) if !c.is_control() => out.push(c),
            _ => out.push_str(&format!("\\u{{{:x}}}", code)),
        }
    }
    out
}
