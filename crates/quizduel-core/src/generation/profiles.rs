//! Player profile registry - the fixed catalog of simulated opponents

use std::sync::OnceLock;

use crate::components::{ExperienceLevel, Personality, PlayerProfile};

/// All simulated opponent profiles, in catalog order.
///
/// Built on first use and shared for the rest of the process.
pub fn list_profiles() -> &'static [PlayerProfile] {
    static CATALOG: OnceLock<Vec<PlayerProfile>> = OnceLock::new();
    CATALOG.get_or_init(build_catalog)
}

/// Look up a catalog profile by id
pub fn find_profile(id: u32) -> Option<&'static PlayerProfile> {
    list_profiles().iter().find(|p| p.id == id)
}

fn build_catalog() -> Vec<PlayerProfile> {
    PROFILE_SEEDS
        .iter()
        .filter_map(|seed| match seed.build() {
            Ok(profile) => Some(profile),
            Err(e) => {
                log::error!("Skipping profile seed {}: {}", seed.id, e);
                None
            }
        })
        .collect()
}

struct ProfileSeed {
    id: u32,
    name: &'static str,
    affiliation: &'static str,
    experience: ExperienceLevel,
    avatar: &'static str,
    color: &'static str,
    skill_level: f32,
    speed_factor: f32,
    personality: Personality,
    specialties: &'static [&'static str],
    weaknesses: &'static [&'static str],
}

impl ProfileSeed {
    fn build(&self) -> Result<PlayerProfile, crate::error::QuizError> {
        Ok(PlayerProfile::new(
            self.id,
            self.name,
            self.affiliation,
            self.experience,
            self.skill_level,
            self.speed_factor,
            self.personality,
        )?
        .with_avatar(self.avatar, self.color)
        .with_specialties(self.specialties)
        .with_weaknesses(self.weaknesses))
    }
}

static PROFILE_SEEDS: &[ProfileSeed] = &[
    ProfileSeed {
        id: 1,
        name: "Anna Schmidt",
        affiliation: "TU München, Informatik",
        experience: ExperienceLevel::Advanced,
        avatar: "AS",
        color: "#4f46e5",
        skill_level: 0.85,
        speed_factor: 1.2,
        personality: Personality::Cooperative,
        specialties: &["Informatik", "Mathematik"],
        weaknesses: &["Geschichte"],
    },
    ProfileSeed {
        id: 2,
        name: "Lukas Weber",
        affiliation: "Universität Heidelberg, Medizin",
        experience: ExperienceLevel::Intermediate,
        avatar: "LW",
        color: "#dc2626",
        skill_level: 0.70,
        speed_factor: 0.9,
        personality: Personality::Competitive,
        specialties: &["Biologie"],
        weaknesses: &["Informatik"],
    },
    ProfileSeed {
        id: 3,
        name: "Mei Chen",
        affiliation: "RWTH Aachen, Maschinenbau",
        experience: ExperienceLevel::Expert,
        avatar: "MC",
        color: "#059669",
        skill_level: 0.90,
        speed_factor: 1.1,
        personality: Personality::Balanced,
        specialties: &["Physik", "Mathematik"],
        weaknesses: &["Literatur"],
    },
    ProfileSeed {
        id: 4,
        name: "Jonas Becker",
        affiliation: "LMU München, Geschichte",
        experience: ExperienceLevel::Beginner,
        avatar: "JB",
        color: "#d97706",
        skill_level: 0.55,
        speed_factor: 0.8,
        personality: Personality::Cooperative,
        specialties: &["Geschichte", "Literatur"],
        weaknesses: &["Physik", "Mathematik"],
    },
    ProfileSeed {
        id: 5,
        name: "Sofia Rossi",
        affiliation: "HU Berlin, Wirtschaftswissenschaften",
        experience: ExperienceLevel::Intermediate,
        avatar: "SR",
        color: "#db2777",
        skill_level: 0.65,
        speed_factor: 1.3,
        personality: Personality::Competitive,
        specialties: &["Wirtschaft"],
        weaknesses: &["Biologie"],
    },
    ProfileSeed {
        id: 6,
        name: "Emre Yilmaz",
        affiliation: "Universität zu Köln, Chemie",
        experience: ExperienceLevel::Advanced,
        avatar: "EY",
        color: "#0891b2",
        skill_level: 0.75,
        speed_factor: 1.0,
        personality: Personality::Balanced,
        specialties: &["Biologie", "Chemie"],
        weaknesses: &["Wirtschaft"],
    },
    ProfileSeed {
        id: 7,
        name: "Clara Fischer",
        affiliation: "Universität Hamburg, Germanistik",
        experience: ExperienceLevel::Beginner,
        avatar: "CF",
        color: "#7c3aed",
        skill_level: 0.50,
        speed_factor: 1.0,
        personality: Personality::Cooperative,
        specialties: &["Literatur", "Geschichte"],
        weaknesses: &["Informatik"],
    },
    ProfileSeed {
        id: 8,
        name: "Felix Wagner",
        affiliation: "KIT Karlsruhe, Physik",
        experience: ExperienceLevel::Expert,
        avatar: "FW",
        color: "#475569",
        skill_level: 0.88,
        speed_factor: 1.4,
        personality: Personality::Competitive,
        specialties: &["Physik", "Informatik"],
        weaknesses: &["Wirtschaft"],
    },
];
