mod subscription_dto;

pub use subscription_dto::{
    CheckoutSessionDto, FollowerEntryDto, FollowerIdsDto, FollowingEntryDto, PaidSubscribeDto,
    SplitFollowersDto, SplitSubscriptionsDto, SubscribeDto, SubscriptionDto, UnsubscribeQuery,
};
