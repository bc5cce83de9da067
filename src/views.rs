//! Server-rendered HTML for the layout, each section and the auth screens.
//!
//! Every piece of text that does not originate in this file goes through
//! [`escape`].

use crate::models::{SectionState, UserProfile, YouTubeVideo};
use crate::settings::Settings;
use crate::types::Repository;
use chrono::{Datelike, NaiveDateTime, Utc};
use std::fmt::Write;
use std::time::Duration;

/// Navigation tabs, in header order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    GitHub,
    YouTube,
    Twitch,
    Twitter,
    Discord,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Home,
        Tab::GitHub,
        Tab::YouTube,
        Tab::Twitch,
        Tab::Twitter,
        Tab::Discord,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Tab::Home => "/",
            Tab::GitHub => "/github",
            Tab::YouTube => "/youtube",
            Tab::Twitch => "/twitch",
            Tab::Twitter => "/twitter",
            Tab::Discord => "/discord",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::GitHub => "GitHub",
            Tab::YouTube => "YouTube",
            Tab::Twitch => "Twitch",
            Tab::Twitter => "Twitter",
            Tab::Discord => "Discord",
        }
    }
}

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn ui_avatar(name: &str, background: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&background={}&color=fff&size=200",
        url::form_urlencoded::byte_serialize(name.as_bytes()).collect::<String>(),
        background
    )
}

fn format_pub_date(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Full HTML document: header, the given main content, footer
pub fn page(
    settings: &Settings,
    user: Option<&UserProfile>,
    active: Option<Tab>,
    title: &str,
    main: &str,
) -> String {
    let display_name = escape(&settings.profile.display_name);
    format!(
        r##"<!DOCTYPE html>
<html lang="en" class="dark">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | {display_name}</title>
<script src="https://cdn.tailwindcss.com"></script>
<script>tailwind.config = {{ darkMode: 'class' }};</script>
<style>
:root {{ --primary: {primary}; --secondary: {secondary}; }}
.gradient-text {{ background: linear-gradient(90deg, var(--primary), var(--secondary)); -webkit-background-clip: text; color: transparent; }}
.glass-card {{ backdrop-filter: blur(12px); background: rgba(148, 163, 184, 0.08); }}
</style>
</head>
<body class="min-h-screen flex flex-col bg-slate-50 dark:bg-[#0f172a] text-slate-900 dark:text-slate-50">
{header}
<main class="flex-grow container mx-auto px-6 py-12 max-w-7xl">
{main}
</main>
{footer}
</body>
</html>
"##,
        title = escape(title),
        display_name = display_name,
        primary = escape(&settings.theme.primary_color),
        secondary = escape(&settings.theme.secondary_color),
        header = header(settings, user, active),
        main = main,
        footer = footer(settings),
    )
}

pub fn header(settings: &Settings, user: Option<&UserProfile>, active: Option<Tab>) -> String {
    let mut nav = String::new();
    for tab in Tab::ALL {
        let class = if Some(tab) == active {
            "px-5 py-2.5 rounded-xl text-sm font-bold bg-blue-600 text-white shadow-xl"
        } else {
            "px-5 py-2.5 rounded-xl text-sm font-bold text-slate-500 dark:text-slate-400 hover:text-blue-600 hover:bg-slate-100 dark:hover:bg-slate-800"
        };
        let current = if Some(tab) == active {
            r#" aria-current="page""#
        } else {
            ""
        };
        let _ = write!(
            nav,
            r#"<a href="{}" class="{}"{}>{}</a>"#,
            tab.path(),
            class,
            current,
            tab.label()
        );
    }

    let account = match user {
        Some(user) => format!(
            r#"<div class="ml-2 flex items-center gap-2" data-auth="signed-in">
<img src="{avatar}" alt="{username}" class="w-8 h-8 rounded-full">
<span class="text-sm font-bold">{username}</span>
<span class="text-[10px] uppercase tracking-widest text-slate-500">{provider}</span>
<form method="post" action="/logout"><button type="submit" class="px-3 py-1.5 rounded-lg text-xs font-bold bg-slate-200 dark:bg-slate-800">Logout</button></form>
</div>"#,
            avatar = escape(&user.avatar),
            username = escape(&user.username),
            provider = user.provider,
        ),
        None => r#"<a href="/login" class="ml-2 px-4 py-2 rounded-xl text-sm font-bold bg-[#5865F2] text-white" data-auth="signed-out">Login</a>"#.to_string(),
    };

    format!(
        r#"<header class="sticky top-0 z-50 glass-card border-b border-slate-200 dark:border-slate-800">
<div class="container mx-auto px-4 py-4 flex flex-col sm:flex-row items-center justify-between gap-4">
<a href="/" class="text-2xl font-bold flex items-center gap-2">
<img src="{avatar}" onerror="this.onerror=null;this.src='{fallback}'" class="w-10 h-10 rounded-xl object-cover" alt="Logo">
<span>{name}</span>
</a>
<nav class="flex flex-wrap justify-center items-center gap-1 sm:gap-2">
{nav}
<button type="button" onclick="document.documentElement.classList.toggle('dark')" class="ml-2 p-2.5 rounded-full text-slate-500" aria-label="Toggle theme">&#9788;</button>
{account}
</nav>
</div>
</header>"#,
        avatar = escape(&settings.profile.avatar_url),
        fallback = escape(&settings.profile.fallback_avatar_url),
        name = escape(&settings.profile.name),
        nav = nav,
        account = account,
    )
}

pub fn footer(settings: &Settings) -> String {
    let socials = &settings.socials;
    format!(
        r#"<footer class="bg-slate-100 dark:bg-slate-900 border-t border-slate-200 dark:border-slate-800 py-12 mt-20">
<div class="container mx-auto px-4 text-center">
<div class="flex justify-center flex-wrap gap-6 mb-8 text-slate-500 dark:text-slate-400">
<a href="{github}" target="_blank" rel="noreferrer">GitHub</a>
<a href="{youtube}" target="_blank" rel="noreferrer">YouTube</a>
<a href="{twitch}" target="_blank" rel="noreferrer">Twitch</a>
<a href="{twitter}" target="_blank" rel="noreferrer">Twitter</a>
</div>
<p class="text-slate-600 dark:text-slate-500 text-sm">&copy; {year} {display_name}. All rights reserved.</p>
<p class="text-slate-400 dark:text-slate-600 text-xs mt-2">Designed for {name} &bull; Built with Rust &amp; Axum</p>
</div>
</footer>"#,
        github = escape(&socials.github.url),
        youtube = escape(&socials.youtube.url),
        twitch = escape(&socials.twitch.url),
        twitter = escape(&socials.twitter.url),
        year = Utc::now().year(),
        display_name = escape(&settings.profile.display_name),
        name = escape(&settings.profile.name),
    )
}

pub fn home(
    settings: &Settings,
    repos: &SectionState<Repository>,
    videos: &[YouTubeVideo],
) -> String {
    let profile = &settings.profile;
    let fallback = ui_avatar(&profile.display_name, "3b82f6");
    format!(
        r#"<div class="space-y-24">
<section class="text-center max-w-5xl mx-auto py-16">
<img src="{avatar}" alt="{name}" onerror="if(this.src!=='{fallback_avatar}'){{this.src='{fallback_avatar}'}}else{{this.onerror=null;this.src='{ui_avatar}'}}" class="w-48 h-48 rounded-[3rem] mx-auto mb-12 object-cover">
<h1 class="text-8xl font-black mb-8 tracking-tighter">I'm <span class="gradient-text">{display_name}</span></h1>
<p class="text-xl text-slate-500 mb-4 font-bold">{tagline}</p>
<p class="text-3xl text-slate-600 dark:text-slate-400 mb-14 max-w-3xl mx-auto">{bio}</p>
<div class="flex flex-wrap justify-center gap-8">
<a href="{github}" target="_blank" rel="noreferrer" class="px-10 py-5 rounded-[2rem] font-black border-2 border-slate-200 dark:border-slate-700">GitHub</a>
<a href="{youtube}" target="_blank" rel="noreferrer" class="px-10 py-5 bg-red-600 text-white rounded-[2rem] font-black">YouTube</a>
</div>
</section>
<div class="grid grid-cols-1 lg:grid-cols-2 gap-12">
{github_section}
{twitch_section}
</div>
{youtube_section}
</div>"#,
        avatar = escape(&profile.avatar_url),
        name = escape(&profile.name),
        fallback_avatar = escape(&profile.fallback_avatar_url),
        ui_avatar = escape(&fallback),
        display_name = escape(&profile.display_name),
        tagline = escape(&profile.tagline),
        bio = escape(&profile.bio),
        github = escape(&settings.socials.github.url),
        youtube = escape(&settings.socials.youtube.url),
        github_section = github_section(settings, repos, "/"),
        twitch_section = twitch_section(settings),
        youtube_section = youtube_section(settings, videos),
    )
}

/// `retry_path` is where the manual retry link points
pub fn github_section(
    settings: &Settings,
    repos: &SectionState<Repository>,
    retry_path: &str,
) -> String {
    let profile_link = if repos.items().is_empty() {
        String::new()
    } else {
        format!(
            r#"<a href="{}" target="_blank" class="text-blue-600 dark:text-blue-400 hover:underline text-sm">View Profile &rarr;</a>"#,
            escape(&settings.socials.github.url)
        )
    };

    let body = match repos {
        SectionState::Failed(message) => format!(
            r#"<div class="text-center py-8" data-state="error">
<p class="text-red-500">Error loading repositories: {}</p>
<a href="{}" class="inline-block mt-4 text-sm font-bold text-blue-600 hover:underline">Retry</a>
</div>"#,
            escape(message),
            escape(retry_path)
        ),
        SectionState::Empty => r#"<div class="text-center py-12 border-2 border-dashed border-slate-300 dark:border-slate-700 rounded-xl" data-state="empty">
<p class="text-slate-600 dark:text-slate-400 font-medium">No repositories found.</p>
<p class="text-slate-500 dark:text-slate-600 text-sm mt-1">This user hasn't shared any public code yet.</p>
</div>"#
            .to_string(),
        SectionState::Ready(repos) => {
            let mut cards = String::new();
            for repo in repos {
                let _ = write!(
                    cards,
                    r#"<a href="{url}" target="_blank" rel="noreferrer" class="repo-card p-4 bg-white dark:bg-slate-800/50 rounded-xl border border-slate-200 dark:border-transparent">
<h3 class="font-semibold text-blue-600 dark:text-blue-300">{name}</h3>
<p class="text-slate-600 dark:text-slate-400 text-sm mt-1">{description}</p>
<div class="flex items-center gap-4 mt-4 text-xs text-slate-500">
<span>{language}</span><span>&#9733; {stars}</span><span>Updated {updated}</span>
</div>
</a>
"#,
                    url = escape(&repo.html_url),
                    name = escape(&repo.name),
                    description = escape(
                        repo.description
                            .as_deref()
                            .filter(|d| !d.is_empty())
                            .unwrap_or("No description provided.")
                    ),
                    language = escape(
                        repo.language
                            .as_deref()
                            .filter(|l| !l.is_empty())
                            .unwrap_or("Misc")
                    ),
                    stars = repo.stargazers_count,
                    updated = repo.updated_at.format("%b %-d, %Y"),
                );
            }
            format!(
                r#"<div class="grid grid-cols-1 md:grid-cols-2 gap-4" data-state="ready">
{}</div>"#,
                cards
            )
        }
    };

    format!(
        r#"<section id="github" class="glass-card p-6 rounded-2xl">
<div class="flex items-center justify-between mb-6">
<h2 class="text-2xl font-bold">GitHub Repositories</h2>
{profile_link}
</div>
{body}
</section>"#
    )
}

pub fn youtube_section(settings: &Settings, videos: &[YouTubeVideo]) -> String {
    let body = if videos.is_empty() {
        r#"<div class="glass-card p-24 rounded-[2.5rem] text-center border-dashed border-2 border-slate-300 dark:border-slate-800" data-state="empty">
<p class="text-2xl font-bold text-slate-400 dark:text-slate-600 uppercase tracking-widest">Empty</p>
<p class="text-slate-500 mt-2">No videos found on this channel yet.</p>
</div>"#
            .to_string()
    } else {
        let mut cards = String::new();
        for video in videos {
            let _ = write!(
                cards,
                r#"<div class="video-card glass-card overflow-hidden rounded-[2rem]" data-video="{guid}">
<a href="{link}" target="_blank" rel="noreferrer"><img src="{thumbnail}" alt="{title}" class="w-full aspect-video object-cover"></a>
<div class="p-6">
<h3 class="font-bold text-lg">{title}</h3>
<div class="mt-4 pt-4 flex justify-between items-center">
<span class="text-[10px] font-bold text-slate-400">{date}</span>
<a href="{link}" target="_blank" rel="noreferrer" class="text-[10px] font-black text-red-600 uppercase">Watch Now</a>
</div>
</div>
</div>
"#,
                guid = escape(&video.guid),
                link = escape(&video.link),
                thumbnail = escape(&video.thumbnail),
                title = escape(&video.title),
                date = escape(&format_pub_date(&video.pub_date)),
            );
        }
        format!(
            r#"<div class="grid grid-cols-1 md:grid-cols-3 gap-8" data-state="ready">
{}</div>"#,
            cards
        )
    };

    format!(
        r#"<section id="youtube" class="space-y-10">
<div class="flex flex-col md:flex-row items-center justify-between gap-6 bg-red-600/5 p-8 rounded-[2rem]">
<div>
<h2 class="text-3xl font-black">YouTube Channel</h2>
<p class="text-slate-500 dark:text-slate-400">Content detected from @{handle}</p>
</div>
<a href="{url}" target="_blank" rel="noreferrer" class="px-8 py-3 bg-red-600 text-white rounded-2xl font-bold">Visit Channel</a>
</div>
{body}
</section>"#,
        handle = escape(settings.youtube_handle()),
        url = escape(&settings.socials.youtube.url),
    )
}

pub fn twitch_section(settings: &Settings) -> String {
    let twitch = &settings.socials.twitch;
    let has_twitch = settings.has_twitch();

    let badge = if has_twitch {
        let (dot, label) = if twitch.is_live {
            ("bg-red-500 animate-pulse", "Live")
        } else {
            ("bg-slate-400 dark:bg-slate-500", "Offline")
        };
        format!(
            r#"<div class="flex items-center gap-2 px-3 py-1 rounded-full"><span class="w-2 h-2 rounded-full {dot}"></span><span class="text-[10px] font-bold uppercase tracking-widest">{label}</span></div>"#
        )
    } else {
        String::new()
    };

    let heading = if has_twitch {
        format!("@{}", escape(&twitch.username))
    } else {
        "No Stream Configured".to_string()
    };

    let action = if has_twitch {
        format!(
            r#"<a href="{}" target="_blank" rel="noreferrer" class="w-full py-4 bg-purple-600 text-white rounded-xl font-bold">Visit Twitch Channel</a>"#,
            escape(&twitch.url)
        )
    } else {
        r#"<div class="text-slate-400 dark:text-slate-600 text-sm italic">Empty</div>"#.to_string()
    };

    format!(
        r#"<section id="twitch" class="glass-card p-8 rounded-2xl flex flex-col h-full">
<div class="flex items-center justify-between mb-8">
<h2 class="text-2xl font-bold">Twitch Status</h2>
{badge}
</div>
<div class="flex-grow flex flex-col items-center justify-center py-10 px-6 text-center">
<h3 class="text-xl font-bold mb-2">{heading}</h3>
<p class="text-slate-600 dark:text-slate-400 text-sm max-w-xs mb-8">The live player is disabled on this site to optimize performance. Visit the channel directly to join the chat and watch the stream.</p>
{action}
</div>
</section>"#
    )
}

pub fn twitter_section(settings: &Settings) -> String {
    let twitter = &settings.socials.twitter;
    let display_name = &settings.profile.display_name;
    let profile_image = format!("https://unavatar.io/twitter/{}", twitter.username);
    let verified = if twitter.verified {
        r#"<span class="text-[#1d9bf0] text-3xl" title="Verified">&#10004;</span>"#
    } else {
        ""
    };

    format!(
        r#"<section id="twitter">
<div class="flex flex-col md:flex-row items-center justify-between mb-10 gap-6">
<h2 class="text-5xl font-black">X Profile</h2>
<span class="text-[11px] font-black uppercase tracking-[0.2em] text-blue-600 dark:text-blue-400">Official Identity</span>
</div>
<div class="max-w-4xl mx-auto glass-card rounded-[3.5rem] overflow-hidden">
<div class="h-48 bg-gradient-to-r from-[#1d9bf0] to-[#0f172a]"></div>
<div class="px-14 pb-14 -mt-20">
<img src="{image}" alt="{username}" onerror="this.onerror=null;this.src='{fallback}'" class="w-40 h-40 rounded-full object-cover">
<div class="mt-8 flex items-center gap-3">
<h3 class="text-5xl font-black tracking-tighter">{display_name}</h3>
{verified}
</div>
<p class="text-2xl text-slate-500 font-bold">@{username}</p>
<a href="{url}" target="_blank" rel="noreferrer" class="mt-8 inline-block px-12 py-5 bg-slate-900 dark:bg-white text-white dark:text-slate-900 rounded-full font-black text-2xl">Visit Profile</a>
</div>
</div>
<a href="{url}" target="_blank" rel="noreferrer" class="max-w-4xl mx-auto mt-12 p-8 bg-slate-900 rounded-[2.5rem] flex items-center justify-between">
<span class="text-white font-black text-xl">Official Presence</span>
<span class="text-slate-400 font-bold">Follow @{username} for real-time updates</span>
</a>
</section>"#,
        image = escape(&profile_image),
        fallback = escape(&ui_avatar(display_name, "1d9bf0")),
        username = escape(&twitter.username),
        display_name = escape(display_name),
        url = escape(&twitter.url),
    )
}

pub fn discord_section(settings: &Settings) -> String {
    if !settings.has_discord() {
        return r#"<section id="discord" class="max-w-4xl mx-auto flex flex-col items-center text-center py-24 border-2 border-dashed border-slate-200 dark:border-slate-800 rounded-[4rem]" data-state="empty">
<h2 class="text-4xl font-black mb-4 tracking-tight">Discord Not Configured</h2>
<p class="text-xl text-slate-500 max-w-md mx-auto font-medium">Settings missing. Configure your invite URL to activate the community hub.</p>
</section>"#
            .to_string();
    }

    let invite = &settings.socials.discord.invite_url;
    let action = if invite.trim().is_empty() {
        String::new()
    } else {
        format!(
            r#"<a href="{}" target="_blank" rel="noreferrer" class="px-20 py-8 bg-[#5865F2] text-white rounded-[3rem] font-black text-3xl inline-flex">Accept Invite</a>"#,
            escape(invite)
        )
    };

    format!(
        r#"<section id="discord" class="max-w-7xl mx-auto flex flex-col items-center text-center">
<h2 class="text-7xl font-black mb-6 tracking-tighter">Community</h2>
<p class="text-2xl text-slate-500 dark:text-slate-400 max-w-2xl mx-auto mb-16 font-medium">Join a growing community. Participate in events and chat with the squad.</p>
{action}
</section>"#
    )
}

/// Loading screen shown while the mock authorization is "verifying"
pub fn authorising(delay: Duration) -> String {
    format!(
        r#"<div class="flex flex-col items-center justify-center min-h-[70vh] text-center" data-delay-ms="{delay_ms}">
<div class="relative w-32 h-32 mb-16">
<div class="absolute inset-0 border-[6px] border-slate-200 dark:border-slate-800 rounded-full"></div>
<div class="absolute inset-0 border-[6px] border-transparent border-t-blue-600 rounded-full animate-spin"></div>
</div>
<h2 class="text-5xl font-black tracking-tighter">Establishing Secure Connection</h2>
<p class="text-xl text-slate-500 font-medium max-w-md mx-auto mt-4">Verifying credentials with <span class="font-bold uppercase text-sm tracking-widest px-2 py-1 bg-slate-100 dark:bg-slate-800 rounded-md">Provider API</span></p>
</div>"#,
        delay_ms = delay.as_millis(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn repo(description: Option<&str>) -> Repository {
        Repository {
            id: 1,
            name: "<script>".to_string(),
            description: description.map(str::to_string),
            html_url: "https://github.com/myperson8/x".to_string(),
            stargazers_count: 7,
            language: None,
            updated_at: Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_repo_card_defaults_and_escaping() {
        let html = github_section(
            &Settings::default(),
            &SectionState::Ready(vec![repo(None)]),
            "/github",
        );
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("No description provided."));
        assert!(html.contains("Misc"));
        assert!(html.contains("Updated Mar 5, 2024"));
        assert!(html.contains("View Profile"));
    }

    #[test]
    fn test_github_error_has_retry() {
        let html = github_section(
            &Settings::default(),
            &SectionState::Failed("Failed to fetch repositories".to_string()),
            "/github",
        );
        assert!(html.contains("Error loading repositories: Failed to fetch repositories"));
        assert!(html.contains(r#"href="/github""#));
        assert!(!html.contains("repo-card"));
    }

    #[test]
    fn test_twitch_without_username() {
        let mut settings = Settings::default();
        settings.socials.twitch.username.clear();
        let html = twitch_section(&settings);
        assert!(html.contains("No Stream Configured"));
        assert!(!html.contains("Visit Twitch Channel"));
    }

    #[test]
    fn test_pub_date_formatting() {
        assert_eq!(format_pub_date("2024-01-15 18:30:00"), "Jan 15, 2024");
        assert_eq!(format_pub_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_active_tab_marked() {
        let html = header(&Settings::default(), None, Some(Tab::Twitter));
        assert!(html.contains(r#"<a href="/twitter" class="px-5 py-2.5 rounded-xl text-sm font-bold bg-blue-600 text-white shadow-xl" aria-current="page">"#));
        assert!(html.contains(r#"data-auth="signed-out""#));
    }
}
