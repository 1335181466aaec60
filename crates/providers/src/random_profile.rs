//! Random profiles - synthesized personas, one `key value` fact per line.

use rand::Rng;
use rand::seq::IndexedRandom;
use smalltalk_core::error::ProfileError;
use smalltalk_core::profile::ProfileGenerator;

const FEMALE_NAMES: &[&str] = &[
    "Alice", "Beatrice", "Clara", "Diana", "Elena", "Fiona", "Grace", "Hannah", "Irene", "Julia",
];
const MALE_NAMES: &[&str] = &[
    "Adam", "Benjamin", "Carlos", "Daniel", "Ethan", "Felix", "George", "Henry", "Isaac", "James",
];
const SURNAMES: &[&str] = &[
    "Anderson", "Brooks", "Carter", "Dalton", "Evans", "Fischer", "Garcia", "Hughes", "Ivanov",
    "Jensen", "Kowalski", "Larsen", "Moreau", "Nakamura",
];
const JOBS: &[&str] = &[
    "librarian", "marine biologist", "baker", "airline pilot", "software engineer", "nurse",
    "architect", "beekeeper", "history teacher", "firefighter", "photographer", "chef",
];
const COMPANIES: &[&str] = &[
    "Northwind Traders", "Blue Harbor Ltd", "Acme Corporation", "Greenfield Farms",
    "Silverline Studios", "Riverside Clinic", "Brightpath Schools",
];
const STREETS: &[&str] = &[
    "Maple Street", "Oak Avenue", "Harbor Road", "Hillside Drive", "Station Lane", "Elm Court",
];
const CITIES: &[&str] = &[
    "Lisbon", "Portland", "Edinburgh", "Kyoto", "Valencia", "Melbourne", "Quebec City", "Tallinn",
];
const BLOOD_GROUPS: &[&str] = &["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];
const FAVOURITES: &[&str] = &[
    "jazz records", "mountain hiking", "old detective novels", "board games", "sourdough bread",
    "sailing", "chess", "watercolour painting", "stargazing", "vintage bicycles",
];

pub struct RandomProfile;

impl RandomProfile {
    fn pick<'a, R: Rng + ?Sized>(rng: &mut R, table: &[&'a str]) -> Result<&'a str, ProfileError> {
        table
            .choose(rng)
            .copied()
            .ok_or_else(|| ProfileError::Generation("empty word table".into()))
    }
}

impl ProfileGenerator for RandomProfile {
    fn name(&self) -> &str {
        "random"
    }

    fn generate(&self) -> Result<String, ProfileError> {
        let mut rng = rand::rng();

        let (sex, first_names) = if rng.random_bool(0.5) {
            ("female", FEMALE_NAMES)
        } else {
            ("male", MALE_NAMES)
        };

        let lines = [
            format!(
                "name {} {}",
                Self::pick(&mut rng, first_names)?,
                Self::pick(&mut rng, SURNAMES)?
            ),
            format!("sex {sex}"),
            format!("job {}", Self::pick(&mut rng, JOBS)?),
            format!("company {}", Self::pick(&mut rng, COMPANIES)?),
            format!(
                "residence {} {}, {}",
                rng.random_range(1..300),
                Self::pick(&mut rng, STREETS)?,
                Self::pick(&mut rng, CITIES)?
            ),
            format!(
                "birthdate {:04}-{:02}-{:02}",
                rng.random_range(1950..2006),
                rng.random_range(1..=12),
                rng.random_range(1..=28)
            ),
            format!("blood_group {}", Self::pick(&mut rng, BLOOD_GROUPS)?),
            format!("favourite {}", Self::pick(&mut rng, FAVOURITES)?),
        ];

        Ok(lines.join("\n"))
    }
}
