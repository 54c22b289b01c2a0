//! Site page: project list and member roster

use axum::response::Html;

/// A project shown on the landing page
pub struct Project {
    pub title: &'static str,
    pub description: &'static str,
    pub link: Option<&'static str>,
    pub image: Option<&'static str>,
}

pub const PROJECTS: &[Project] = &[
    Project {
        title: "morae.me",
        description: "온라인 끝말잇기 게임 '끄투' 전적 검색 사이트",
        link: Some("https://morae.me"),
        image: Some("/moraeme.svg"),
    },
    Project {
        title: "이하봇",
        description: "이터널 리턴 전적 검색 디스코드 봇",
        link: Some("https://discord.com/discovery/applications/769163955137675275"),
        image: Some("/ihahbot.svg"),
    },
    Project {
        title: "메버에 진심인 봇",
        description: "1:1 덱 빌딩 결투 보드게임 '메타버서스 시리즈' 정보 검색 디스코드 봇",
        link: Some("https://discord.com/discovery/applications/1421287090015965224"),
        image: Some("/metaversus.svg"),
    },
];

pub const DISCORD_INVITE: &str = "https://discord.gg/cf3D2HCzEh";
pub const GITHUB_ORG: &str = "https://github.com/team-lument";

/// GET / - landing page
pub async fn home_page() -> Html<String> {
    Html(render_home(PROJECTS))
}

pub fn render_home(projects: &[Project]) -> String {
    let items: String = projects.iter().map(render_project).collect();

    PAGE_TEMPLATE
        .replace("{{PROJECTS}}", &items)
        .replace("{{DISCORD}}", DISCORD_INVITE)
        .replace("{{GITHUB}}", GITHUB_ORG)
}

fn render_project(project: &Project) -> String {
    let image = project
        .image
        .map(|src| {
            format!(
                r#"<img src="{}" alt="{}" width="50" height="50" class="round">"#,
                escape_html(src),
                escape_html(project.title)
            )
        })
        .unwrap_or_default();

    let card = format!(
        r#"<div class="card">{}<div><div class="title">{}</div><div class="muted">{}</div></div></div>"#,
        image,
        escape_html(project.title),
        escape_html(project.description)
    );

    match project.link {
        Some(href) => format!(
            r#"<a class="plain" href="{}" target="_blank">{}</a>"#,
            escape_html(href),
            card
        ),
        None => card,
    }
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Team Lument</title>
    <meta name="description" content="Team Lument">
    <style>
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: #111;
            color: #f4f4f5;
            min-height: 100vh;
            display: flex;
            align-items: center;
            justify-content: center;
            padding: 2rem;
        }
        .page { display: flex; flex-direction: column; gap: 2.5rem; width: 100%; max-width: 42rem; }
        .brand { display: flex; gap: 1rem; align-items: center; justify-content: center; }
        .brand span { font-size: 1.9rem; font-weight: 700; letter-spacing: -0.02em; }
        .view { display: flex; flex-direction: column; gap: 1rem; transition: opacity 0.2s, transform 0.2s; }
        .view.hidden { display: none; }
        .view.entering { opacity: 0; transform: translateY(10px); }
        .members { display: grid; grid-template-columns: 1fr; gap: 1rem; }
        @media (min-width: 480px) { .members { grid-template-columns: repeat(2, 1fr); } }
        .card {
            display: flex;
            gap: 1rem;
            align-items: center;
            padding: 1.25rem;
            border: 1px solid #27272a;
            border-radius: 0.5rem;
            transition: all 0.2s;
            cursor: pointer;
        }
        .card:hover { border-color: #3f3f46; background: #18181b; }
        .title { font-weight: 700; font-size: 18px; }
        .muted { color: #a1a1aa; font-size: 0.875rem; }
        .round { border-radius: 9999px; }
        a.plain { color: inherit; text-decoration: none; display: block; width: 100%; }
        .avatar { width: 48px; height: 48px; border-radius: 9999px; background: #27272a; object-fit: cover; }
        .name-row { display: flex; gap: 0.25rem; align-items: baseline; }
        .badges { display: flex; gap: 0.25rem; flex-wrap: wrap; margin-top: 0.25rem; }
        .badge {
            display: inline-flex;
            align-items: center;
            gap: 0.3rem;
            font-size: 0.75rem;
            padding: 0.1rem 0.4rem;
            border: 1px solid #3f3f46;
            border-radius: 0.25rem;
            background: #18181b;
        }
        .dot { width: 8px; height: 8px; border-radius: 9999px; display: inline-block; }
        .tabs { display: flex; gap: 2rem; justify-content: center; }
        .tab {
            font-size: 1.125rem;
            font-weight: 700;
            letter-spacing: 0.1em;
            color: #a1a1aa;
            cursor: pointer;
            transition: all 0.2s;
            background: none;
            border: none;
        }
        .tab:hover, .tab.active { color: #f4f4f5; }
        .links { position: absolute; bottom: 2rem; left: 2rem; display: flex; gap: 1rem; }
        .links a { color: #a1a1aa; text-decoration: none; }
        .links a:hover { color: #f4f4f5; }
    </style>
</head>
<body>
    <div class="page">
        <div class="brand">
            <img src="/lument.svg" alt="Lument" width="70" height="70">
            <span>TEAM LUMENT</span>
        </div>

        <div id="project-view" class="view">
            {{PROJECTS}}
        </div>
        <div id="member-view" class="view members hidden"></div>

        <div class="tabs">
            <button class="tab active" data-view="project">PROJECTS</button>
            <button class="tab" data-view="member">MEMBERS</button>
        </div>
    </div>

    <div class="links">
        <a href="{{DISCORD}}" target="_blank">Discord</a>
        <a href="{{GITHUB}}" target="_blank">GitHub</a>
    </div>

    <script>
        const views = {
            project: document.getElementById("project-view"),
            member: document.getElementById("member-view"),
        };

        function show(name) {
            for (const [key, el] of Object.entries(views)) {
                if (key === name) {
                    el.classList.remove("hidden");
                    el.classList.add("entering");
                    requestAnimationFrame(() => el.classList.remove("entering"));
                } else {
                    el.classList.add("hidden");
                }
            }
            document.querySelectorAll(".tab").forEach((tab) => {
                tab.classList.toggle("active", tab.dataset.view === name);
            });
        }

        document.querySelectorAll(".tab").forEach((tab) => {
            tab.addEventListener("click", () => show(tab.dataset.view));
        });

        function el(tag, className, text) {
            const node = document.createElement(tag);
            if (className) node.className = className;
            if (text !== undefined) node.textContent = text;
            return node;
        }

        function memberCard(member) {
            const card = el("div", "card");

            const avatar = el("img", "avatar");
            avatar.alt = member.nickname ?? member.handle;
            if (member.avatar) {
                avatar.src = `https://cdn.discordapp.com/avatars/${member.id}/${member.avatar}.png?size=1024`;
            }
            card.appendChild(avatar);

            const body = el("div");
            const nameRow = el("div", "name-row");
            nameRow.appendChild(el("span", "title", member.nickname ?? member.global_name ?? member.handle.slice(1)));
            nameRow.appendChild(el("span", "muted", member.handle));
            body.appendChild(nameRow);

            const badges = el("div", "badges");
            [...member.roles].reverse().forEach((role) => {
                const badge = el("span", "badge");
                const dot = el("span", "dot");
                if (role.color) dot.style.background = role.color;
                badge.appendChild(dot);
                badge.appendChild(document.createTextNode(role.name));
                badges.appendChild(badge);
            });
            body.appendChild(badges);

            card.appendChild(body);
            return card;
        }

        async function loadMembers() {
            try {
                const response = await fetch("/api/members");
                if (!response.ok) throw new Error("Failed to fetch");
                const members = await response.json();
                members.forEach((member) => views.member.appendChild(memberCard(member)));
            } catch (error) {
                console.error("Error fetching members:", error);
            }
        }

        loadMembers();
    </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_every_project() {
        let page = render_home(PROJECTS);
        for project in PROJECTS {
            assert!(page.contains(project.title));
        }
        assert!(page.contains(DISCORD_INVITE));
        assert!(!page.contains("{{PROJECTS}}"));
    }

    #[test]
    fn test_project_without_link_or_image() {
        let html = render_project(&Project {
            title: "<draft>",
            description: "Tom & Jerry",
            link: None,
            image: None,
        });

        assert!(!html.contains("<a "));
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;draft&gt;"));
        assert!(html.contains("Tom &amp; Jerry"));
    }
}
