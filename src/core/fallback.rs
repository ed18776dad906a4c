//! Substitute records shown when the backend is unreachable or empty.
//!
//! Each section's degraded mode is part of its contract, so the data lives
//! here as named sets rather than inline at the call sites.

use crate::domain::model::{
    Client, ClientAttributes, Logo, LogoAttributes, LogoData, MediaRef, Service, SocialLinks,
    TeamMember, Testimonial,
};

pub const HERO_FALLBACK_IMAGE: &str = "/images/hero-bg.jpg";
pub const AVATAR_IMAGE: &str = "/images/avatar.png";
pub const CLIENT_LOGO_PLACEHOLDER: &str = "/images/placeholder.svg";

/// Indicator dots rendered by the hero when there are no videos.
pub const HERO_PLACEHOLDER_DOTS: usize = 5;

const LEGAL_CONSULTATION_CONTENT: &str = "General Legal Consultations\n\
At Law Firm, we provide comprehensive legal consultations covering all legal aspects that our clients may encounter in their daily lives or business activities.\n\
\n\
Corporate Legal Consultations\n\
We at the Law Firm understand the importance of legal consultations for companies in building and enhancing their businesses.\n\
\n\
Our advisory services about:\n\
- Establishing and registering companies.\n\
- All types of contracts and agreements.\n\
- Commercial disputes.\n\
- Compliance with local and international laws and regulations.\n\
\n\
Individual Legal Consultations\n\
Law Firm offers customized advisory services for individuals, including:\n\
- Family issues such as divorce, alimony, and custody.\n\
- Real estate matters like buying, selling, and renting properties.\n\
- Employment issues such as hiring and wrongful termination.\n\
- Criminal cases and defending personal rights.";

fn avatar(id: u64) -> MediaRef {
    MediaRef {
        id,
        name: "avatar.png".to_string(),
        alternative_text: None,
        url: AVATAR_IMAGE.to_string(),
    }
}

fn service(id: u64, slug: &str, title: &str, description: &str) -> Service {
    Service {
        id,
        document_id: slug.to_string(),
        title: title.to_string(),
        slug: slug.to_string(),
        description: description.to_string(),
        icon: None,
        content: None,
    }
}

pub fn services() -> Vec<Service> {
    let mut consultation = service(
        1,
        "legal-consultation",
        "Legal Consultation Services",
        "Professional legal advice and consultation for individuals and businesses. Our experienced lawyers provide comprehensive guidance on various legal matters.",
    );
    consultation.content = Some(LEGAL_CONSULTATION_CONTENT.to_string());

    vec![
        consultation,
        service(
            2,
            "foreign-investment",
            "Foreign Investment Services",
            "Expert guidance for foreign investors looking to establish business presence. We help navigate regulatory requirements and investment opportunities.",
        ),
        service(
            3,
            "contracts",
            "Contracts",
            "Contract drafting, review, and negotiation services. We ensure your agreements are legally sound and protect your interests.",
        ),
        service(
            4,
            "corporate-governance",
            "Corporate Governance Services",
            "Comprehensive corporate governance solutions to ensure compliance and effective management structures for your organization.",
        ),
        service(
            5,
            "intellectual-property",
            "Intellectual Property",
            "Protection and enforcement of intellectual property rights including patents, trademarks, and copyrights.",
        ),
        service(
            6,
            "arbitration",
            "Arbitration",
            "Alternative dispute resolution services to resolve conflicts efficiently outside of traditional court proceedings.",
        ),
    ]
}

pub fn service_by_slug(slug: &str) -> Option<Service> {
    services().into_iter().find(|s| s.slug == slug)
}

pub fn team_members() -> Vec<TeamMember> {
    (1..=3)
        .map(|i| TeamMember {
            id: i,
            document_id: format!("fallback-{}", i),
            name: format!("Name Here {}", i),
            role: "POSITION HERE".to_string(),
            bio: "Lorem Ipsum is simply dummy text of the printing and typesetting industry."
                .to_string(),
            image: Some(avatar(i)),
            social_links: Some(SocialLinks {
                linkedin: Some("#".to_string()),
                twitter: None,
                github: Some("#".to_string()),
            }),
        })
        .collect()
}

pub fn testimonials() -> Vec<Testimonial> {
    let entries = [
        (
            "Mohammed Saif",
            "CEO/Company",
            "Al Safar and Partners",
            "With the help of the hospitable staff of Al Safar and Partners I was able to get my work done without any hassle. I was always updated about my case and my queries never went unanswered.",
        ),
        (
            "Ahmed Ali",
            "Director/Business",
            "Tech Solutions",
            "Outstanding legal services with professional approach. The team provided excellent guidance throughout our business setup process.",
        ),
        (
            "Fatima Hassan",
            "Managing Partner",
            "Investment Group",
            "Exceptional legal counsel that helped us navigate complex investment regulations. Their knowledge of local and international law is impressive.",
        ),
    ];

    entries
        .iter()
        .zip(1u64..)
        .map(|(&(name, position, company, text), id)| Testimonial {
            id,
            document_id: format!("fallback-testimonial-{}", id),
            name: name.to_string(),
            position: position.to_string(),
            company: company.to_string(),
            testimonial: text.to_string(),
            image: Some(avatar(id)),
        })
        .collect()
}

pub fn clients() -> Vec<Client> {
    let entries = [
        ("TechCorp Solutions", "https://techcorp.com", "Technology"),
        ("Innovation Labs", "https://innovationlabs.com", "Research & Development"),
        ("Global Dynamics", "https://globaldynamics.com", "Consulting"),
        ("Future Enterprises", "https://futureenterprises.com", "Enterprise"),
        ("Digital First Co.", "https://digitalfirst.com", "Digital Marketing"),
        ("StartUp Nexus", "https://startupnexus.com", "Startup"),
    ];

    entries
        .iter()
        .zip(1u32..)
        .map(|(&(name, website, industry), id)| Client {
            id: id.to_string(),
            attributes: ClientAttributes {
                name: name.to_string(),
                logo: Some(Logo {
                    data: Some(LogoData {
                        attributes: Some(LogoAttributes {
                            url: CLIENT_LOGO_PLACEHOLDER.to_string(),
                        }),
                    }),
                }),
                testimonial: format!("{} trusted us with their legal work.", name),
                website: Some(website.to_string()),
                industry: Some(industry.to_string()),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_fallback_service_slugs_are_unique() {
        let services = services();
        let slugs: HashSet<&str> = services.iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(slugs.len(), services.len());
        assert!(service_by_slug("arbitration").is_some());
        assert!(service_by_slug("tax").is_none());
    }

    #[test]
    fn test_fallback_sets_are_populated() {
        assert_eq!(team_members().len(), 3);
        assert_eq!(testimonials().len(), 3);
        assert!(clients().iter().all(|c| c.logo_url() == Some(CLIENT_LOGO_PLACEHOLDER)));
    }
}
