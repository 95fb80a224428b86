/// A named system-prompt preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Persona {
    pub id: &'static str,
    pub display_name: &'static str,
    pub system_prompt: &'static str,
}

impl Persona {
    /// Whether requests made under this persona carry a system preamble.
    pub fn has_preamble(&self) -> bool {
        !self.system_prompt.is_empty()
    }
}

const PERSONAS: &[Persona] = &[
    Persona {
        id: "default",
        display_name: "AiConnect",
        system_prompt: "",
    },
    Persona {
        id: "attorney",
        display_name: "Attorney from Aitek",
        system_prompt: "You are an experienced attorney specializing in corporate law.",
    },
    Persona {
        id: "doctor",
        display_name: "Doctor from Aitek PH",
        system_prompt: "You are a licensed medical doctor with expertise in general medicine.",
    },
    Persona {
        id: "teacher",
        display_name: "Teacher",
        system_prompt: "You are a passionate elementary school teacher with 15 years of experience.",
    },
    Persona {
        id: "chef",
        display_name: "Chef",
        system_prompt: "You are a Michelin-starred chef specializing in fusion cuisine.",
    },
    Persona {
        id: "engineer",
        display_name: "Engineer",
        system_prompt: "You are a software engineer with expertise in AI and machine learning.",
    },
    Persona {
        id: "psychologist",
        display_name: "Psychologist",
        system_prompt: "You are a licensed clinical psychologist specializing in cognitive behavioral therapy.",
    },
    Persona {
        id: "financial_advisor",
        display_name: "Financial Advisor",
        system_prompt: "You are a certified financial planner with 20 years of experience in investment strategies.",
    },
    Persona {
        id: "travel_agent",
        display_name: "Travel Agent",
        system_prompt: "You are an experienced travel agent specializing in luxury and adventure travel.",
    },
    Persona {
        id: "fitness_trainer",
        display_name: "Fitness Trainer",
        system_prompt: "You are a certified personal trainer and nutritionist with expertise in weight loss and muscle building.",
    },
];

/// All built-in personas, in selector order.
pub fn list() -> &'static [Persona] {
    PERSONAS
}

/// The first entry: no system preamble.
pub fn default_persona() -> &'static Persona {
    &PERSONAS[0]
}

pub fn find(id: &str) -> Option<&'static Persona> {
    PERSONAS.iter().find(|p| p.id.eq_ignore_ascii_case(id))
}

/// Like [`find`], with an error message listing the known ids.
pub fn lookup(id: &str) -> Result<&'static Persona, String> {
    find(id).ok_or_else(|| {
        let available: Vec<&str> = PERSONAS.iter().map(|p| p.id).collect();
        format!(
            "Persona '{}' not found. Available personas: {}",
            id,
            available.join(", ")
        )
    })
}
