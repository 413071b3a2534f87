//! Deterministic synthetic citizens for mock mode.
//!
//! Every population is generated from an explicit seed, so the same seed and
//! size always produce the same records. Mock pagination relies on this: the
//! dataset is rebuilt on every call yet looks stable to the caller.

use crate::models::{Address, Citizen, CitizenOverrides};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

/// Seed used by [`make_citizens`].
pub const POPULATION_SEED: u64 = 123;
/// Number of citizens served by mock mode.
pub const POPULATION_SIZE: usize = 150;

const FIRST_NAMES: &[&str] = &[
    "João", "Maria", "José", "Ana", "Pedro", "Francisca", "Lucas", "Juliana", "Gabriel",
    "Fernanda", "Rafael", "Patrícia", "Mateus", "Aline", "Carlos", "Camila", "Bruno", "Larissa",
    "Thiago", "Beatriz", "Felipe", "Letícia", "Gustavo", "Mariana", "Rodrigo", "Vitória",
];

const FEMALE_NAMES: &[&str] = &[
    "Maria", "Ana", "Francisca", "Antônia", "Adriana", "Juliana", "Márcia", "Fernanda",
    "Patrícia", "Aline", "Sandra", "Cláudia", "Luzia", "Raimunda",
];

const LAST_NAMES: &[&str] = &[
    "Silva", "Santos", "Oliveira", "Souza", "Rodrigues", "Ferreira", "Alves", "Pereira", "Lima",
    "Gomes", "Costa", "Ribeiro", "Martins", "Carvalho", "Almeida", "Lopes", "Soares", "Fernandes",
    "Vieira", "Barbosa", "Rocha", "Dias", "Nascimento", "Andrade", "Moreira", "Nunes",
];

const STREETS: &[&str] = &[
    "Rua das Flores", "Avenida Brasil", "Rua São João", "Rua Sete de Setembro",
    "Avenida Getúlio Vargas", "Rua Quinze de Novembro", "Travessa Santa Luzia",
    "Rua Dom Pedro II", "Avenida Beira Mar", "Rua do Comércio",
];

const NEIGHBORHOODS: &[&str] = &[
    "Centro", "Boa Vista", "Jardim América", "Vila Nova", "São José", "Santa Cruz", "Aldeota",
    "Bela Vista", "Liberdade", "Planalto",
];

const CITIES: &[(&str, &str)] = &[
    ("Fortaleza", "CE"),
    ("Recife", "PE"),
    ("Salvador", "BA"),
    ("São Paulo", "SP"),
    ("Rio de Janeiro", "RJ"),
    ("Belo Horizonte", "MG"),
    ("Curitiba", "PR"),
    ("Porto Alegre", "RS"),
    ("Manaus", "AM"),
    ("Belém", "PA"),
    ("Goiânia", "GO"),
    ("Natal", "RN"),
];

const COMPLEMENTS: &[&str] = &["Apto. 101", "Casa 2", "Bloco B", "Fundos", "Sala 304", "Apto. 12"];

const EMAIL_DOMAINS: &[&str] = &["gmail.com", "hotmail.com", "yahoo.com.br", "outlook.com"];

const GENDERS: &[&str] = &["M", "F"];
const RACES: &[&str] = &["white", "black", "brown", "indigenous", "yellow"];
const ISSUING_AGENCIES: &[&str] = &["SSP", "DETRAN", "IFP"];

fn pick<R: Rng + ?Sized>(rng: &mut R, pool: &[&'static str]) -> &'static str {
    pool.choose(rng).copied().unwrap_or_default()
}

fn numeric<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

fn full_name<R: Rng + ?Sized>(rng: &mut R, first_names: &[&'static str]) -> String {
    format!(
        "{} {} {}",
        pick(rng, first_names),
        pick(rng, LAST_NAMES),
        pick(rng, LAST_NAMES)
    )
}

fn phone<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{} {}-{}", numeric(rng, 2), numeric(rng, 4), numeric(rng, 4))
}

fn email<R: Rng + ?Sized>(rng: &mut R, name: &str) -> String {
    let local: Vec<String> = name
        .split_whitespace()
        .take(2)
        .map(|part| {
            part.to_lowercase()
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect()
        })
        .collect();
    format!(
        "{}{}@{}",
        local.join("."),
        rng.random_range(1..100u32),
        pick(rng, EMAIL_DOMAINS)
    )
}

fn birth_date<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        rng.random_range(1940..=2020u32),
        rng.random_range(1..=12u32),
        rng.random_range(1..=28u32)
    )
}

fn address<R: Rng + ?Sized>(rng: &mut R) -> Address {
    let (city, uf) = CITIES.choose(rng).copied().unwrap_or(("Fortaleza", "CE"));
    Address {
        cep: Some(numeric(rng, 8)),
        street: Some(pick(rng, STREETS).to_string()),
        number: Some(numeric(rng, 3)),
        complement: Some(pick(rng, COMPLEMENTS).to_string()),
        neighborhood: Some(pick(rng, NEIGHBORHOODS).to_string()),
        city: Some(city.to_string()),
        uf: Some(uf.to_string()),
    }
}

/// Produces one plausible citizen from `rng`, then applies `overrides`.
pub fn make_citizen<R: Rng + ?Sized>(rng: &mut R, overrides: &CitizenOverrides) -> Citizen {
    let id = uuid::Builder::from_random_bytes(rng.random()).into_uuid();
    let name = full_name(rng, FIRST_NAMES);

    let mut citizen = Citizen {
        id: id.to_string(),
        cpf: rng.random_range(10_000_000_000u64..=99_999_999_999).to_string(),
        cns: numeric(rng, 15),
        gender: pick(rng, GENDERS).to_string(),
        cpf_responsible: None,
        mother_name: full_name(rng, FEMALE_NAMES),
        birth_date: birth_date(rng),
        phone: Some(phone(rng)),
        cellphone: Some(phone(rng)),
        email: Some(email(rng, &name)),
        address: address(rng),
        race: pick(rng, RACES).to_string(),
        co_cidadao: rng.random_range(1000..=9999),
        is_dead: rng.random_bool(0.5),
        pregnant: Some(rng.random_bool(0.5)),
        identification_document: Some(numeric(rng, 9)),
        issuing_agency: Some(pick(rng, ISSUING_AGENCIES).to_string()),
        name,
    };

    citizen.apply(overrides);
    citizen
}

/// Generates `size` citizens from `seed` with no overrides.
pub fn generate_population(seed: u64, size: usize) -> Vec<Citizen> {
    generate_with_overrides(seed, size, &CitizenOverrides::default())
}

/// Generates `count` citizens from the fixed [`POPULATION_SEED`].
///
/// Calls with the same `count` and `overrides` return identical sequences.
pub fn make_citizens(count: usize, overrides: &CitizenOverrides) -> Vec<Citizen> {
    generate_with_overrides(POPULATION_SEED, count, overrides)
}

fn generate_with_overrides(seed: u64, size: usize, overrides: &CitizenOverrides) -> Vec<Citizen> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..size).map(|_| make_citizen(&mut rng, overrides)).collect()
}
