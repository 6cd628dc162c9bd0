use askama::Template;
use eb_core::view::PostView;

/// The board page: post form on top, recent posts below.
#[derive(Template)]
#[template(path = "board.html")]
pub struct BoardTemplate<'a> {
    pub title: &'a str,
    pub posts: &'a [PostView],
    pub max_name_chars: usize,
    pub max_message_chars: usize,
}
