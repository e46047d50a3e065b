//! Embedded sample projects used when no data candidate can be read.

use crate::models::project::{BuildSection, Project};

fn sample(
    slug: &str,
    title: &str,
    year: i32,
    overview: &str,
    stack: &[&str],
    tags: &[&str],
    features: &[&str],
) -> Project {
    let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    Project {
        slug: slug.to_string(),
        title: title.to_string(),
        overview: Some(overview.to_string()),
        year: Some(year),
        stack: strings(stack),
        tags: strings(tags),
        build: Some(BuildSection {
            description: None,
            features: strings(features),
        }),
        thumbnail: Some(format!("/assets/{}.jpg", slug)),
        ..Default::default()
    }
}

pub fn fallback_projects() -> Vec<Project> {
    vec![
        sample(
            "project-1",
            "E-Commerce Dashboard",
            2024,
            "A comprehensive admin dashboard for managing e-commerce operations with real-time analytics, inventory management, and customer insights. Built with modern web technologies and responsive design principles.",
            &["HTML", "CSS", "JavaScript", "Chart.js"],
            &["dashboard", "data-viz"],
            &["Real-time analytics", "Responsive design", "Interactive charts", "Data visualization"],
        ),
        sample(
            "project-2",
            "Weather App",
            2023,
            "A clean, intuitive weather application that provides current conditions and forecasts. Features location-based weather data, beautiful animations, and a minimal interface that focuses on essential information.",
            &["HTML", "CSS", "JavaScript", "Weather API"],
            &["api", "ui"],
            &["Location-based data", "5-day forecast", "Beautiful animations", "Minimal design"],
        ),
        sample(
            "project-3",
            "Task Management Tool",
            2023,
            "A productivity-focused task management application with drag-and-drop functionality, project organization, and team collaboration features. Designed for efficiency and ease of use.",
            &["HTML", "CSS", "JavaScript", "Local Storage"],
            &["productivity", "ui"],
            &["Drag & drop", "Project organization", "Team collaboration", "Data persistence"],
        ),
        sample(
            "project-4",
            "Portfolio Website",
            2022,
            "A responsive portfolio website showcasing creative work and professional experience. Features smooth animations, dark mode support, and optimized performance across all devices.",
            &["HTML", "CSS", "JavaScript", "GSAP"],
            &["ui", "web"],
            &["Responsive design", "Dark mode", "Smooth animations", "Performance optimized"],
        ),
    ]
}
