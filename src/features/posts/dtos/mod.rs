mod post_dto;

pub use post_dto::{
    CreatePostInput, ListPostsQuery, MediaDto, MediaStatsDto, PostListDto, PostViewDto, ScrollDto,
    UpdatePostDto, UploadedFile,
};
