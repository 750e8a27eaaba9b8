use rand::Rng;

pub const SLUG_LEN: usize = 6;
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Source of candidate slugs for links created without a custom slug.
///
/// Generators don't look at storage; uniqueness is enforced by the registry
/// when the slug is inserted.
pub trait SlugGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Six characters drawn uniformly, with replacement, from `ALPHABET`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSlugs;

impl SlugGenerator for RandomSlugs {
    fn generate(&self) -> String {
        random_slug(&mut rand::thread_rng(), SLUG_LEN)
    }
}

/// Generate a random alphanumeric string of the given length.
pub fn random_slug<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
