use bstmap::prelude::*;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

const USER_COUNT: usize = 500;
const FIRST_NAMES: [&str; 12] = [
    "Ada", "Boris", "Chen", "Dara", "Emeka", "Farah", "Goran", "Hana", "Ines", "Jun", "Kofi",
    "Lena",
];

#[derive(Debug, Clone)]
struct User {
    id: u128,
    name: String,
    age: u8,
}

impl Record for User {
    type Id = u128;

    fn id(&self) -> u128 {
        self.id
    }
}

fn make_users(rng: &mut StdRng, count: usize) -> impl Iterator<Item = User> + '_ {
    (0..count).map(move |_| User {
        id: rng.gen(),
        name: FIRST_NAMES
            .choose(&mut *rng)
            .copied()
            .unwrap_or("Anonymous")
            .to_string(),
        age: rng.gen_range(1..=101),
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut rng = StdRng::from_entropy();
    let mut database = OrderedMap::with_config(MapConfig::default())?;

    let report = database.bulk_load(make_users(&mut rng, USER_COUNT));
    println!(
        "Loaded {} users with {} rebuilds, tree height {}",
        report.loaded,
        report.rebalances,
        database.tree().height()
    );

    let test_user = User {
        id: 207_700_000_000,
        name: "Johnny Silverhand".to_string(),
        age: 62,
    };
    database.insert_or_update(test_user.id, test_user.clone());

    println!("There are {} entries", database.len());
    if let Some(user) = database.lookup(&test_user.id) {
        println!("The name of the test user is {} ({})", user.name, user.age);
    }

    let youngest = database.values().min_by_key(|user| user.age);
    if let Some(user) = youngest {
        println!("Youngest user: {user:?}");
    }

    let sample: OrderedMap<u32, ()> = [15, 2, 12, 4, 9, 5, 6, 1]
        .into_iter()
        .map(|key| (key, ()))
        .collect();
    println!("\n{}", sample.render());

    Ok(())
}
