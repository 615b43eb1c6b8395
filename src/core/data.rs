use crate::types::{Project, Service};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

impl Project {
    fn new(
        id: u32,
        name: &str,
        description: &str,
        technologies: &[&str],
        github_url: &str,
        live_url: &str,
        image: &str,
    ) -> Self {
        Project {
            id,
            name: name.to_string(),
            description: description.to_string(),
            technologies: strings(technologies),
            github_url: github_url.to_string(),
            live_url: live_url.to_string(),
            image: image.to_string(),
        }
    }
}

impl Service {
    fn new(id: u32, title: &str, description: &str, icon: &str, features: &[&str]) -> Self {
        Service {
            id,
            title: title.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            features: strings(features),
        }
    }
}

/// The project catalog served by `GET /api/projects`.
pub fn projects() -> Vec<Project> {
    vec![
        Project::new(
            1,
            "B.I",
            "A complete BI Solution with OLAP Cube & IA integration for predictions ",
            &["React", ".NET", "FLASK", "MDX Query"],
            "https://github.com/ZoubairMabrouk/Pipline-BI-Complet",
            "https://github.com/ZoubairMabrouk/Business-Intelligence",
            "https://images.pexels.com/photos/270348/pexels-photo-270348.jpeg?auto=compress&cs=tinysrgb&w=800",
        ),
        Project::new(
            2,
            "Travel Agency",
            "Mobile application to the voyage of the Bus with online Ticket reservation",
            &["Flutter", "Firebase", "Figma"],
            "https://github.com/ZoubairMabrouk/R-servation-de-ticket-en-ligne-Soretras",
            "https://github.com/ZoubairMabrouk/R-servation-de-ticket-en-ligne-Soretras",
            "https://images.pexels.com/photos/574071/pexels-photo-574071.jpeg?auto=compress&cs=tinysrgb&w=800",
        ),
        Project::new(
            3,
            "Carpooling App",
            "Application web & mobile for Carpooling",
            &["Angular", "Flutter", "LARAVEL", "MySQL"],
            "https://github.com/ZoubairMabrouk/Conv-Admin-Espace",
            "https://github.com/ZoubairMabrouk/covoiturage-api",
            "https://images.pexels.com/photos/546819/pexels-photo-546819.jpeg?auto=compress&cs=tinysrgb&w=800",
        ),
    ]
}

/// The service catalog served by `GET /api/services`.
pub fn services() -> Vec<Service> {
    vec![
        Service::new(
            1,
            "Full-Stack Development",
            "Complete web application development using modern frameworks and technologies",
            "💻",
            &[
                "JS/TS",
                "React/Angular",
                "Node.js/Laravel/Spring/.NET",
                "Database Design",
                "Microservice Architectures",
            ],
        ),
        Service::new(
            2,
            "Mobile Development",
            "Native and cross-platform mobile applications for iOS and Android",
            "📱",
            &[
                "Flutter",
                "Android Native Java",
                "Firebase Tools",
                "App Store Deployment",
            ],
        ),
        Service::new(
            3,
            "Machine & Deep Learning",
            "Manipulation of large datasets, Models Pipelines, Clustering/Classification/Regression, Computer vision, Natural Language Processing",
            "🧠",
            &[
                "Scikit-Learn",
                "TensorFlow",
                "Streamlit",
                "Word2Vec",
                "TF-IDF",
                "Numpy & Matplotlib",
            ],
        ),
        Service::new(
            4,
            "Embedded Systems",
            "Smart Home, Medical Solutions, Industrial Integration with Siemens",
            "⚙️",
            &["C/C++", "MicroPython", "Firebase", "Conception"],
        ),
    ]
}
