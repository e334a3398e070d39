//! Genomes: circular 64-byte programs and the gene instruction codes.

/// Number of genes in every genome.
pub const GENOME_LEN: usize = 64;

/// Gene codes executed by the per-cell virtual machine. Bytes below
/// [`MOVE_FORWARD`] are relative jumps; bytes at or above [`NUM_GENE_CODES`]
/// are inert.
pub const MOVE_FORWARD: u8 = 64;
pub const TURN_CCW: u8 = 65;
pub const TURN_CW: u8 = 66;
pub const EAT_FORWARD: u8 = 67;
pub const REPRODUCE_FORWARD: u8 = 68;
pub const REPRODUCE_BACKWARD: u8 = 69;
pub const PHOTOSYNTHESIZE: u8 = 70;
pub const CHECK_FORWARD: u8 = 71;
pub const CHECK_ENERGY: u8 = 72;
pub const CONVERT_MINERALS: u8 = 73;

/// One past the last meaningful gene code; mutation draws from `0..NUM_GENE_CODES`.
pub const NUM_GENE_CODES: u8 = 74;

/// A circular sequence of 64 gene bytes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Genome(pub [u8; GENOME_LEN]);

impl Genome {
    #[must_use]
    pub fn zeroed() -> Self {
        Genome([0; GENOME_LEN])
    }

    /// Genome with every slot set to the same code.
    #[must_use]
    pub fn filled(code: u8) -> Self {
        Genome([code; GENOME_LEN])
    }

    /// Genome built from a prefix; remaining slots are zero (fall-through).
    #[must_use]
    pub fn from_prefix(prefix: &[u8]) -> Self {
        let mut genes = [0; GENOME_LEN];
        genes[..prefix.len()].copy_from_slice(prefix);
        Genome(genes)
    }

    /// Gene byte at `at`, wrapping around the genome.
    #[must_use]
    pub fn at(&self, at: u16) -> u8 {
        self.0[usize::from(at) % GENOME_LEN]
    }

    pub fn set(&mut self, at: u8, code: u8) {
        self.0[usize::from(at) % GENOME_LEN] = code;
    }

    /// Byte-wise Hamming distance between two genomes.
    #[must_use]
    pub fn distance(&self, other: &Genome) -> u32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .filter(|(a, b)| a != b)
            .count() as u32
    }

    /// Relatedness heuristic: genomes differing in at most `threshold`
    /// bytes count as the same lineage.
    #[must_use]
    pub fn related(&self, other: &Genome, threshold: u32) -> bool {
        self.distance(other) <= threshold
    }
}
