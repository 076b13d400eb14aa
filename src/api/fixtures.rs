//! Fixed development dataset.
//!
//! Served by [`super::FakeBackend`] and substituted for backend data when
//! the backend is unreachable in development mode.

use crate::types::bookmark::{Bookmark, OwnerRef, PostRef};
use crate::types::post::{Post, PostAuthor};
use crate::types::stamp_board::{StampBoard, COLOR_PALETTE};
use crate::types::user::User;

pub const FIXTURE_USER_ID: &str = "test-user-1";

fn owner() -> OwnerRef {
    OwnerRef {
        id: FIXTURE_USER_ID.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn bookmark(
    id: &str,
    place_name: &str,
    address: &str,
    latitude: f64,
    longitude: f64,
    visited: bool,
    day: u32,
    post: Option<(&str, &str)>,
) -> Bookmark {
    Bookmark {
        id: id.to_string(),
        place_name: place_name.to_string(),
        address: address.to_string(),
        latitude,
        longitude,
        visited,
        created_at: format!("2024-01-{:02}T00:00:00.000Z", day),
        user: owner(),
        post: post.map(|(id, title)| PostRef {
            id: id.to_string(),
            title: title.to_string(),
        }),
    }
}

fn board(id: &str, title: &str, color: &str, day: u32, bookmarks: Vec<Bookmark>) -> StampBoard {
    StampBoard {
        id: id.to_string(),
        title: title.to_string(),
        color: color.to_string(),
        created_at: format!("2024-01-{:02}T00:00:00.000Z", day),
        user: owner(),
        bookmarks,
    }
}

/// The three fallback boards: cafes, restaurants, Japanese food.
pub fn stamp_boards() -> Vec<StampBoard> {
    vec![
        board(
            "1",
            "카페 스탬프",
            COLOR_PALETTE[0],
            1,
            vec![
                bookmark("1", "스타벅스 강남점", "서울 강남구 강남대로 396", 37.5665, 126.978, true, 1, Some(("1", "카페 리뷰"))),
                bookmark("2", "투썸플레이스 홍대점", "서울 마포구 홍대로 123", 37.5575, 126.925, false, 2, None),
                bookmark("3", "할리스 커피 신촌점", "서울 서대문구 신촌로 123", 37.5595, 126.943, false, 3, None),
            ],
        ),
        board(
            "2",
            "맛집 스탬프",
            COLOR_PALETTE[1],
            4,
            vec![
                bookmark("4", "맛있는 치킨집", "서울 강남구 테헤란로 456", 37.5725, 126.985, true, 5, Some(("2", "맛집 리뷰"))),
                bookmark("5", "피자나라", "서울 마포구 와우산로 789", 37.5535, 126.935, false, 6, None),
                bookmark("6", "스시로", "서울 강남구 강남대로 321", 37.5685, 126.988, true, 7, Some(("3", "스시 맛집"))),
            ],
        ),
        board(
            "3",
            "일식집 스탬프",
            COLOR_PALETTE[2],
            8,
            vec![
                bookmark("7", "우동집", "서울 강남구 논현로 654", 37.5515, 126.988, true, 9, None),
                bookmark("8", "라멘집", "서울 강남구 강남대로 789", 37.5795, 126.991, false, 10, None),
            ],
        ),
    ]
}

/// Every bookmark appearing in the fallback boards, each id once.
pub fn saved_bookmarks() -> Vec<Bookmark> {
    let mut out: Vec<Bookmark> = Vec::new();
    for b in stamp_boards().into_iter().flat_map(|board| board.bookmarks) {
        if !out.iter().any(|existing| existing.id == b.id) {
            out.push(b);
        }
    }
    out
}

pub fn posts() -> Vec<Post> {
    let author = PostAuthor {
        id: FIXTURE_USER_ID.to_string(),
        email: "test1@example.com".to_string(),
    };
    [
        ("1", "카미야가 어쩌구저쩌구", "내용은 이렇고 저렇고", "카미야"),
        ("2", "한신포차 맛있어요", "정말 맛있는 포차였어요", "한신포차"),
        ("3", "가미우동 추천", "우동이 정말 맛있어요", "가미우동"),
        ("4", "맛집 발견했어요", "이곳 꼭 가보세요", "맛집"),
        ("5", "오늘 점심 메뉴", "오늘 점심 뭐 먹을까요", "점심"),
        ("6", "저녁 맛집 추천", "저녁에 먹기 좋은 곳", "저녁"),
        ("7", "주말 맛집 탐방", "주말에 가볼만한 곳", "주말"),
        ("8", "디저트 맛집", "달콤한 디저트 맛집", "디저트"),
    ]
    .into_iter()
    .map(|(id, title, content, address)| Post {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        address: address.to_string(),
        latitude: 37.5665,
        longitude: 126.978,
        user: Some(author.clone()),
    })
    .collect()
}

pub fn user() -> User {
    User {
        id: FIXTURE_USER_ID.to_string(),
        email: "test1@example.com".to_string(),
        name: "Test User".to_string(),
        picture: None,
        nickname: Some("테스트 사용자1".to_string()),
        created_at: "2024-01-01T00:00:00.000Z".to_string(),
    }
}
