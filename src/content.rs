use crate::ui::gallery::{GalleryItem, ItemId};

pub const RESUME_PATH: &str = "/resume.pdf";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Page {
    Home,
    AboutMe,
    Experience,
    Resume,
    NotFound,
}

impl Page {
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "" | "/index.html" => Self::Home,
            "/about_me" => Self::AboutMe,
            "/experience" => Self::Experience,
            "/resume" => Self::Resume,
            _ => Self::NotFound,
        }
    }
}

pub struct Profile {
    pub name: &'static str,
    pub greeting: &'static str,
    pub photo: &'static str,
    pub intro: &'static str,
    pub degrees: &'static [&'static str],
    pub paragraphs: &'static [&'static str],
}

pub const PROFILE: Profile = Profile {
    name: "Shinhaeng Lee",
    greeting: "Hi, I'm Shinhaeng Lee! 👋",
    photo: "/profile.jpg",
    intro: "I'm a student majoring in Computer Science at Georgia Tech. \
            I am pursuing the BS/MS Program and will complete my:",
    degrees: &["🎓 B.S.: Fall 2025", "🎓 M.S.: Fall 2026"],
    paragraphs: &[
        "My passion lies in training large AI models and pushing the boundaries of AI research. \
         I love experimenting with transformers, diffusion models, and neural architectures \
         to enhance deep learning capabilities.",
        "When I'm not training models, I'm exploring new AI architectures and delving deep into \
         research on cutting-edge advancements in machine learning and artificial intelligence.",
    ],
};

pub fn gallery_items() -> Vec<GalleryItem> {
    ["/un1.jpeg", "/rome.jpg", "/un2.jpeg"]
        .into_iter()
        .zip(["Me 1", "Me 2", "Me 3"])
        .enumerate()
        .map(|(index, (src, alt))| GalleryItem {
            id: ItemId(index as u32),
            src,
            alt,
            width: 400,
            height: 300,
        })
        .collect()
}

/// Hero photo with a hoverable region that links out to the museum.
pub struct Hotspot {
    pub image: &'static str,
    pub image_alt: &'static str,
    pub label: &'static str,
    pub href: &'static str,
    pub left_pct: f64,
    pub top_pct: f64,
    pub width_pct: f64,
    pub height_pct: f64,
}

pub const MUSEUM_HOTSPOT: Hotspot = Hotspot {
    image: "/rome.jpg",
    image_alt: "Standing in front of the Colosseum",
    label: "Visit the Colosseum Archaeological Park ↗",
    href: "https://colosseo.it/en/",
    left_pct: 18.0,
    top_pct: 10.0,
    width_pct: 64.0,
    height_pct: 55.0,
};

pub struct Experience {
    pub company: &'static str,
    pub role: &'static str,
    pub date: &'static str,
    pub points: &'static [&'static str],
    pub image: &'static str,
}

pub const EXPERIENCES: &[Experience] = &[
    Experience {
        company: "UN Peacekeeper - United Nations Interim Force in Lebanon (UNIFIL)",
        role: "Signal Company, Republic of Korea Battalion",
        date: "June 2023 - January 2024",
        points: &[
            "Maintained, repaired, and constructed websites and servers for internal communication.",
            "Managed computer devices as part of the Signal Company, Republic of Korea Battalion.",
            "Engaged in civilian operations and peacekeeping initiatives to support the local community.",
            "Worked with multinational forces to enhance regional stability and security.",
        ],
        image: "/unifil.png",
    },
    Experience {
        company: "VIP Research Team - Georgia Institute of Technology (GT)",
        role: "Undergraduate Researcher",
        date: "Spring 2025 - Present",
        points: &[
            "Conducting research in the Georgia Tech VIP (Vertically Integrated Projects) program on AI-driven Augmented and Alternative Communication (AAC).",
            "Developing an iOS application to assist individuals with speech impairments using AI-powered text-to-speech synthesis.",
            "Exploring the effectiveness of Visual Scene Display (VSD) for post-stroke aphasia patients to improve language rehabilitation.",
            "Collaborating with faculty and fellow researchers at Georgia Tech to enhance accessibility solutions in communication technologies.",
        ],
        image: "/gt.png",
    },
];

pub struct Skill {
    pub name: &'static str,
    pub icon: &'static str,
}

const DEVICON_BASE: &str = "https://cdn.jsdelivr.net/gh/devicons/devicon/icons";

pub const SKILLS: &[Skill] = &[
    Skill { name: "Python", icon: "python/python-original.svg" },
    Skill { name: "Java", icon: "java/java-original.svg" },
    Skill { name: "C", icon: "c/c-original.svg" },
    Skill { name: "HTML", icon: "html5/html5-original.svg" },
    Skill { name: "CSS", icon: "css3/css3-original.svg" },
    Skill { name: "JavaScript", icon: "javascript/javascript-original.svg" },
    Skill { name: "React", icon: "react/react-original.svg" },
    Skill { name: "Next.js", icon: "nextjs/nextjs-original.svg" },
    Skill { name: "TypeScript", icon: "typescript/typescript-original.svg" },
    Skill { name: "PostgreSQL", icon: "postgresql/postgresql-original.svg" },
    Skill { name: "Django", icon: "django/django-plain.svg" },
    Skill { name: "Git", icon: "git/git-original.svg" },
];

impl Skill {
    pub fn icon_url(&self) -> String {
        format!("{DEVICON_BASE}/{}", self.icon)
    }
}
